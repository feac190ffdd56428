//! Multicrop Core - fixed-size multi-crop engine
//!
//! This crate is the coordinate-transform and crop-rectangle engine behind
//! Multicrop: the bidirectional mapping between display space (a bordered,
//! scaled-down thumbnail) and source space (real pixels of the loaded
//! image), the drag/clamp rules that keep fixed-size crop rectangles valid,
//! and the batch-export logic that turns N on-screen rectangles into N
//! pixel-exact output files.
//!
//! No UI lives here. A toolkit adapter translates pointer events into the
//! [`crops::CropSet`] drag commands, and all image I/O goes through the
//! [`backend::ImageBackend`] seam.

pub mod backend;
pub mod batch;
pub mod crops;
pub mod geometry;
pub mod session;

pub use backend::{ImageBackend, RasterBackend};
pub use crops::{CropSet, DragToken};
pub use geometry::{CoordinateSpace, Point, Rect, ViewConfig};
pub use session::{Session, SessionError};

/// Filename prefix marking exported crops, so re-running a batch over the
/// same folder never re-crops its own outputs.
pub const OUTPUT_PREFIX: &str = "tk_crop__";

/// A named, fixed target output size.
///
/// Config-time data: the engine takes any list of `N >= 1` presets and
/// never changes it at runtime.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropPreset {
    /// Short name, used in output filenames.
    pub name: String,
    /// Exported crop width in source pixels. Must be positive.
    pub target_width: u32,
    /// Exported crop height in source pixels. Must be positive.
    pub target_height: u32,
    /// Outline color for the rectangle in a rendering adapter.
    pub color: String,
}

impl CropPreset {
    pub fn new(name: &str, target_width: u32, target_height: u32, color: &str) -> Self {
        debug_assert!(
            target_width > 0 && target_height > 0,
            "preset target size must be positive"
        );
        Self {
            name: name.to_string(),
            target_width,
            target_height,
            color: color.to_string(),
        }
    }
}

/// The reference preset table: four fixed crop sizes, A through D.
pub fn default_presets() -> Vec<CropPreset> {
    vec![
        CropPreset::new("A", 200, 200, "blue"),
        CropPreset::new("B", 500, 500, "yellow"),
        CropPreset::new("C", 1200, 600, "magenta"),
        CropPreset::new("D", 1280, 720, "red"),
    ]
}
