//! Write a synthetic challenge with a known gap.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use rand::rngs::StdRng;
use slidetrack_solver_core::synthetic::{generate, ChallengeSpec};

pub fn run(
    output: PathBuf,
    images_dir: Option<PathBuf>,
    spec: ChallengeSpec,
    total_time: u64,
    rng: &mut StdRng,
) -> anyhow::Result<ExitCode> {
    let challenge = generate(spec, rng).ok_or_else(|| {
        anyhow::anyhow!(
            "gap {}x{} at ({}, {}) does not fit in a {}x{} background",
            spec.slider_size,
            spec.slider_size,
            spec.gap_x,
            spec.gap_y,
            spec.background_width,
            spec.background_height
        )
    })?;

    let request = challenge
        .to_request(total_time)
        .context("Failed to encode challenge images")?;
    let json = serde_json::to_string_pretty(&request)?;
    std::fs::write(&output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Challenge written to: {}", output.display());
    println!("  Gap at: ({}, {})", spec.gap_x, spec.gap_y);

    if let Some(dir) = images_dir {
        std::fs::create_dir_all(&dir)?;
        let background_path = dir.join("background.png");
        let slider_path = dir.join("slider.png");
        challenge
            .background
            .save(&background_path)
            .with_context(|| format!("Failed to write {}", background_path.display()))?;
        challenge
            .slider
            .save(&slider_path)
            .with_context(|| format!("Failed to write {}", slider_path.display()))?;
        println!("  Images: {}, {}", background_path.display(), slider_path.display());
    }

    Ok(ExitCode::SUCCESS)
}
