//! Per-file crop session.
//!
//! A [`Session`] owns everything about one opened image at one zoom level:
//! the (possibly resampled) image, the visible region, the coordinate space,
//! and the crop set. Re-zooming discards the session and opens a fresh one;
//! nothing is merged across zoom levels. Closing a session before export
//! drops all rectangle placements with no side effects.

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::backend::{ExportError, ImageBackend, LoadError};
use crate::crops::CropSet;
use crate::geometry::{fit_thumbnail, CoordinateSpace, Rect, StateError, ViewConfig};
use crate::{CropPreset, OUTPUT_PREFIX};

/// Lowest accepted zoom level. One step below it the resample factor
/// `1 + 0.1 * zoom` reaches zero.
pub const MIN_ZOOM: i32 = -9;

/// Failure to open a session on a file.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The zoom level would shrink the image to nothing.
    #[error("zoom level {0} is below the minimum of {MIN_ZOOM}")]
    ZoomOutOfRange(i32),

    /// The file could not be loaded as an image.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The viewing geometry is unusable.
    #[error(transparent)]
    State(#[from] StateError),
}

/// One rectangle that failed to export.
#[derive(Debug)]
pub struct ExportFailure {
    /// Name of the preset whose crop failed.
    pub preset: String,
    pub error: ExportError,
}

/// Outcome of one export run: every rectangle is attempted independently,
/// so written paths and failures can both be non-empty.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<ExportFailure>,
}

/// An open editing session on one file at one zoom level.
#[derive(Debug)]
pub struct Session<B: ImageBackend> {
    path: PathBuf,
    zoom: i32,
    config: ViewConfig,
    image: B::Image,
    region: Rect,
    space: CoordinateSpace,
    crops: CropSet,
}

impl<B: ImageBackend> Session<B> {
    /// Open `path` at `zoom`, computing the display geometry and placing
    /// the preset rectangles.
    ///
    /// A nonzero zoom resamples the image to
    /// `round(dimension * (1 + 0.1 * zoom))` before anything else; the
    /// visible region is the whole resampled image.
    ///
    /// # Errors
    ///
    /// Fails if `zoom` is below [`MIN_ZOOM`], if the file cannot be decoded
    /// as an image, or if the fitted thumbnail degenerates.
    pub fn open(
        backend: &B,
        path: impl Into<PathBuf>,
        zoom: i32,
        presets: Vec<CropPreset>,
        config: ViewConfig,
    ) -> Result<Self, SessionError> {
        if zoom < MIN_ZOOM {
            return Err(SessionError::ZoomOutOfRange(zoom));
        }

        let path = path.into();
        let loaded = backend.load(&path)?;

        let image = if zoom != 0 {
            let factor = 1.0 + 0.1 * zoom as f64;
            let (w, h) = backend.dimensions(&loaded);
            let new_w = ((w as f64 * factor).round() as u32).max(1);
            let new_h = ((h as f64 * factor).round() as u32).max(1);
            backend.resample(&loaded, new_w, new_h)
        } else {
            loaded
        };

        let (width, height) = backend.dimensions(&image);
        let region = Rect::from_size(width, height);
        let (thumb_w, thumb_h) = fit_thumbnail(width, height, &config);
        let space = CoordinateSpace::new(width, height, thumb_w, thumb_h, config.display_offset)?;

        let mut crops = CropSet::new(presets);
        crops.place_initial(&space);

        info!(
            "opened {} at zoom {zoom}: region {width}x{height}, thumbnail {thumb_w}x{thumb_h}",
            path.display()
        );

        Ok(Self {
            path,
            zoom,
            config,
            image,
            region,
            space,
            crops,
        })
    }

    /// Reopen the same file at `zoom`, discarding this session and all of
    /// its rectangle placements.
    pub fn rezoom(self, backend: &B, zoom: i32) -> Result<Self, SessionError> {
        Self::open(backend, self.path, zoom, self.crops.presets(), self.config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    /// The visible region of the (resampled) image, in source space.
    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn space(&self) -> &CoordinateSpace {
        &self.space
    }

    pub fn crops(&self) -> &CropSet {
        &self.crops
    }

    /// Mutable crop set, for routing drag commands into the session.
    pub fn crops_mut(&mut self) -> &mut CropSet {
        &mut self.crops
    }

    /// Export one file per preset rectangle into the source file's
    /// directory.
    ///
    /// Rectangles are independent: a failed save is recorded in the report
    /// and the remaining rectangles are still attempted. Nothing is atomic
    /// across the set.
    pub fn export(&self, backend: &B) -> ExportReport {
        let mut report = ExportReport::default();
        for region in self.crops.export_geometry(&self.space) {
            let out = output_filename(&self.path, &region.name, self.zoom);
            match backend.crop_and_save(&self.image, region.rect, &out) {
                Ok(()) => {
                    info!("wrote {}", out.display());
                    report.written.push(out);
                }
                Err(error) => {
                    warn!("export of crop {} failed: {error}", region.name);
                    report.failures.push(ExportFailure {
                        preset: region.name,
                        error,
                    });
                }
            }
        }
        report
    }
}

/// Output path for one exported crop, next to the source file.
///
/// Zoom 0 yields `tk_crop__<PRESET>__<stem><ext>`; nonzero zoom appends a
/// `_SMALLER_<n>` / `_LARGER_<n>` magnitude marker before the extension.
pub fn output_filename(source: &Path, preset_name: &str, zoom: i32) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let name = match zoom {
        0 => format!("{OUTPUT_PREFIX}{preset_name}__{stem}{ext}"),
        z if z < 0 => {
            format!("{OUTPUT_PREFIX}{preset_name}__{stem}_SMALLER_{}{ext}", z.unsigned_abs())
        }
        z => format!("{OUTPUT_PREFIX}{preset_name}__{stem}_LARGER_{z}{ext}"),
    };

    source.parent().unwrap_or_else(|| Path::new("")).join(name)
}
