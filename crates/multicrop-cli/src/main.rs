//! Headless batch exporter for Multicrop.
//!
//! Drives the engine through the same command interface a GUI adapter
//! would: one independent session per file, optional `--place` drags, then
//! an export of every preset rectangle.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::error;

use multicrop_core::batch::{run_batch, Placement};
use multicrop_core::{default_presets, Point, RasterBackend, ViewConfig};

#[derive(Parser)]
#[command(name = "multicrop")]
#[command(version, about = "Export fixed-size crops from every image in a folder", long_about = None)]
struct Cli {
    /// Folder containing the images to crop
    #[arg(value_name = "DIR")]
    input: PathBuf,

    /// Zoom level: 0 = original size, each step resamples by 10%
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    zoom: i32,

    /// Move a preset rectangle before export, in display pixels
    /// (repeatable)
    #[arg(long = "place", value_name = "NAME=X,Y")]
    place: Vec<String>,
}

/// Parse a `NAME=X,Y` placement argument.
fn parse_placement(arg: &str) -> Result<Placement> {
    let (name, pos) = arg
        .split_once('=')
        .with_context(|| format!("expected NAME=X,Y, got {arg:?}"))?;
    let (x, y) = pos
        .split_once(',')
        .with_context(|| format!("expected NAME=X,Y, got {arg:?}"))?;
    Ok(Placement {
        preset: name.trim().to_string(),
        position: Point::new(
            x.trim().parse().with_context(|| format!("bad x in {arg:?}"))?,
            y.trim().parse().with_context(|| format!("bad y in {arg:?}"))?,
        ),
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let placements = cli
        .place
        .iter()
        .map(|arg| parse_placement(arg))
        .collect::<Result<Vec<_>>>()?;

    let backend = RasterBackend::new();
    let outcome = run_batch(
        &backend,
        &cli.input,
        cli.zoom,
        &default_presets(),
        ViewConfig::default(),
        &placements,
    )
    .with_context(|| format!("cannot read directory {}", cli.input.display()))?;

    for path in &outcome.written {
        println!("{}", path.display());
    }
    for (path, err) in &outcome.failed_files {
        error!("{}: {err}", path.display());
    }
    for (path, failure) in &outcome.failed_crops {
        error!("{}: crop {}: {}", path.display(), failure.preset, failure.error);
    }

    if !outcome.failed_files.is_empty() || !outcome.failed_crops.is_empty() {
        bail!(
            "{} file(s) failed to load, {} crop(s) failed to export",
            outcome.failed_files.len(),
            outcome.failed_crops.len()
        );
    }
    Ok(())
}
