//! Display-to-source coordinate mapping for one loaded image.
//!
//! A [`CoordinateSpace`] captures the affine relation between the on-screen
//! thumbnail (display space, padded by a fixed border offset) and the
//! possibly zoom-resampled image behind it (source space). It is computed
//! once per image load and is read-only for the rest of the viewing session;
//! nothing recomputes it implicitly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error states that make the viewing geometry unusable.
///
/// These are fatal to the current session but must never take down the host
/// process; callers surface them and drop the session.
#[derive(Debug, Error)]
pub enum StateError {
    /// The fitted thumbnail collapsed to zero pixels on an axis.
    #[error("thumbnail has zero dimension ({width}x{height})")]
    EmptyThumbnail { width: u32, height: u32 },
}

/// Viewport configuration: the maximum thumbnail box and the border padding
/// around the displayed image.
///
/// Explicit configuration rather than module-level constants, so a host can
/// size the viewport however it likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Maximum width of the fitted thumbnail, in display pixels.
    pub thumb_max_width: u32,
    /// Maximum height of the fitted thumbnail, in display pixels.
    pub thumb_max_height: u32,
    /// Border padding between the viewport edge and the thumbnail.
    pub display_offset: i32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        // Reference viewport: 1024x1024 box with a 16px border.
        Self {
            thumb_max_width: 1024,
            thumb_max_height: 1024,
            display_offset: 16,
        }
    }
}

/// The affine mapping between display space and source space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    display_offset: i32,
    scale_x: f64,
    scale_y: f64,
    thumb_width: u32,
    thumb_height: u32,
}

impl CoordinateSpace {
    /// Build the mapping from the visible region's dimensions and the
    /// fitted thumbnail's dimensions.
    ///
    /// `scale = region dimension / thumbnail dimension` per axis.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::EmptyThumbnail`] if either thumbnail dimension
    /// is zero.
    pub fn new(
        region_width: u32,
        region_height: u32,
        thumb_width: u32,
        thumb_height: u32,
        display_offset: i32,
    ) -> Result<Self, StateError> {
        if thumb_width == 0 || thumb_height == 0 {
            return Err(StateError::EmptyThumbnail {
                width: thumb_width,
                height: thumb_height,
            });
        }

        Ok(Self {
            display_offset,
            scale_x: region_width as f64 / thumb_width as f64,
            scale_y: region_height as f64 / thumb_height as f64,
            thumb_width,
            thumb_height,
        })
    }

    pub fn display_offset(&self) -> i32 {
        self.display_offset
    }

    /// Source pixels per display pixel on the horizontal axis.
    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    /// Source pixels per display pixel on the vertical axis.
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Displayed thumbnail width, in display pixels.
    pub fn thumb_width(&self) -> u32 {
        self.thumb_width
    }

    /// Displayed thumbnail height, in display pixels.
    pub fn thumb_height(&self) -> u32 {
        self.thumb_height
    }
}

/// Fit an image into the configured thumbnail box, preserving aspect ratio.
///
/// Shrink-only: an image already inside the box keeps its dimensions. A
/// non-degenerate input always produces dimensions of at least 1x1.
pub fn fit_thumbnail(width: u32, height: u32, config: &ViewConfig) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let ratio_w = config.thumb_max_width as f64 / width as f64;
    let ratio_h = config.thumb_max_height as f64 / height as f64;
    let ratio = ratio_w.min(ratio_h);

    if ratio >= 1.0 {
        return (width, height);
    }

    let fit_w = ((width as f64 * ratio).round() as u32).max(1);
    let fit_h = ((height as f64 * ratio).round() as u32).max(1);
    (fit_w, fit_h)
}
