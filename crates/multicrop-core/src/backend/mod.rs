//! Image backend seam.
//!
//! The session controller talks to image decoding, resampling, and
//! crop-and-save exclusively through the [`ImageBackend`] trait, keeping the
//! geometry engine independent of any particular codec stack (and testable
//! against an in-memory fake). [`RasterBackend`] is the production
//! implementation on top of the `image` crate.

mod raster;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::Rect;

pub use raster::RasterBackend;

/// Failure to get a usable image out of a file.
///
/// Surfaced per file; a batch run collects these and keeps going.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file contents are not a decodable image.
    #[error("cannot decode {path} as an image: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Failure to write one exported crop.
///
/// Reported per rectangle; the remaining rectangles of the same export are
/// still attempted.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The crop rectangle has no area to export.
    #[error("crop region for {path} is empty")]
    EmptyRegion { path: PathBuf },

    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Encoding the output image failed.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Decode, resample, and crop-and-save operations for one image format
/// stack.
///
/// All calls are synchronous; the engine treats them as blocking I/O and
/// never runs two of them concurrently against the same session.
pub trait ImageBackend {
    /// Handle to a loaded image.
    type Image;

    /// Load and decode the image at `path`.
    fn load(&self, path: &Path) -> Result<Self::Image, LoadError>;

    /// Width and height of a loaded image, in pixels.
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    /// Resample to exactly `width` x `height` with a high-quality filter.
    fn resample(&self, image: &Self::Image, width: u32, height: u32) -> Self::Image;

    /// Crop `rect` out of `image` and write it to `out`.
    ///
    /// The output must have exactly `rect`'s dimensions; parts of `rect`
    /// outside the image are padded with black rather than shrinking the
    /// output.
    fn crop_and_save(&self, image: &Self::Image, rect: Rect, out: &Path)
        -> Result<(), ExportError>;
}
