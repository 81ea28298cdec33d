//! Print the best gap offset for a pair of images.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use serde::Serialize;
use slidetrack_common::{SlidetrackError, SolverConfig};
use slidetrack_image_buffer::decode_file;
use slidetrack_solver_core::Solver;

#[derive(Serialize)]
struct LocateOutput {
    x: u32,
    y: u32,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    requested: Option<PlacementScore>,
}

/// Score at a caller-chosen placement; `score` is null when the placement
/// is out of bounds or its window is flat.
#[derive(Serialize)]
struct PlacementScore {
    x: u32,
    y: u32,
    score: Option<f64>,
}

pub fn run(
    background: PathBuf,
    slider: PathBuf,
    at: Option<(u32, u32)>,
    config: &SolverConfig,
) -> anyhow::Result<ExitCode> {
    let solver = Solver::new(config.clone()).context("Invalid solver configuration")?;

    let background = decode_file(&background)
        .with_context(|| format!("Failed to decode {}", background.display()))?;
    let slider =
        decode_file(&slider).with_context(|| format!("Failed to decode {}", slider.display()))?;

    let offset = solver
        .locate(&background, &slider)
        .map_err(SlidetrackError::from)?;

    let requested = match at {
        Some((x, y)) => {
            let score = solver
                .score_at(&background, &slider, x, y)
                .map_err(SlidetrackError::from)?;
            tracing::debug!(x, y, ?score, "Scored requested placement");
            Some(PlacementScore { x, y, score })
        }
        None => None,
    };

    super::print_json(
        &LocateOutput {
            x: offset.x,
            y: offset.y,
            score: offset.score,
            requested,
        },
        false,
    )?;
    Ok(ExitCode::SUCCESS)
}
