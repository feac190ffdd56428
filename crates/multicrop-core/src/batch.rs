//! Batch processing over a folder of images.
//!
//! Each file gets its own fully independent [`Session`]; a file that fails
//! to load is recorded and never halts the rest of the batch. Previously
//! exported outputs are recognized by their filename prefix and skipped on
//! the next run.

use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::backend::ImageBackend;
use crate::geometry::{Point, ViewConfig};
use crate::session::{ExportFailure, Session, SessionError};
use crate::{CropPreset, OUTPUT_PREFIX};

/// A requested pre-export move of one preset rectangle: drag its top-left
/// to a display-space position (clamped on release).
#[derive(Debug, Clone)]
pub struct Placement {
    pub preset: String,
    pub position: Point,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Every output file written, across all files.
    pub written: Vec<PathBuf>,
    /// Files that could not be opened at all.
    pub failed_files: Vec<(PathBuf, SessionError)>,
    /// Individual crops that failed to export.
    pub failed_crops: Vec<(PathBuf, ExportFailure)>,
}

impl BatchOutcome {
    /// True when every file loaded and every crop was written.
    pub fn is_clean(&self) -> bool {
        self.failed_files.is_empty() && self.failed_crops.is_empty()
    }
}

/// List the croppable files in `dir`, sorted by name.
///
/// Skips directories, hidden entries (leading dot, which covers `.DS_Store`
/// and friends), and prior outputs carrying the [`OUTPUT_PREFIX`].
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be read.
pub fn scan_directory(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name.starts_with(OUTPUT_PREFIX) {
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

/// Open a session per file in `dir`, apply the requested placements, and
/// export every preset crop.
///
/// Placements naming an unknown preset are warned about and skipped. Load
/// failures are collected into the outcome; remaining files are always
/// processed.
///
/// # Errors
///
/// Only the directory listing itself can fail here; everything per-file is
/// reported through the outcome.
pub fn run_batch<B: ImageBackend>(
    backend: &B,
    dir: &Path,
    zoom: i32,
    presets: &[CropPreset],
    config: ViewConfig,
    placements: &[Placement],
) -> io::Result<BatchOutcome> {
    let files = scan_directory(dir)?;
    info!("batch: {} file(s) in {}", files.len(), dir.display());

    let mut outcome = BatchOutcome::default();
    for file in files {
        let mut session = match Session::open(backend, &file, zoom, presets.to_vec(), config) {
            Ok(session) => session,
            Err(err) => {
                warn!("skipping {}: {err}", file.display());
                outcome.failed_files.push((file, err));
                continue;
            }
        };

        apply_placements(&mut session, placements);

        let report = session.export(backend);
        outcome.written.extend(report.written);
        outcome
            .failed_crops
            .extend(report.failures.into_iter().map(|f| (file.clone(), f)));
    }
    Ok(outcome)
}

/// Route each placement through the drag command interface, the same way a
/// toolkit adapter would: press, unclamped motion, clamped release.
fn apply_placements<B: ImageBackend>(session: &mut Session<B>, placements: &[Placement]) {
    for placement in placements {
        let crops = session.crops_mut();
        let Some(id) = crops.find(&placement.preset) else {
            warn!("no preset named {:?}, placement skipped", placement.preset);
            continue;
        };
        // Placed ids are always draggable, so the token is present.
        let Some(token) = crops.begin_drag(id) else {
            continue;
        };
        let _ = crops.update_drag(token, placement.position, false);
        let _ = crops.update_drag(token, placement.position, true);
        crops.end_drag(token);
    }
}
