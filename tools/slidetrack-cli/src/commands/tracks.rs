//! Synthesize a drag trajectory without image matching.

use anyhow::Context;
use rand::rngs::StdRng;
use slidetrack_common::SolverConfig;
use slidetrack_solver_core::TrackSynthesizer;

pub fn run(
    distance: u32,
    total_time: u64,
    config: &SolverConfig,
    pretty: bool,
    rng: &mut StdRng,
) -> anyhow::Result<std::process::ExitCode> {
    anyhow::ensure!(total_time > 0, "--total-time must be positive");
    config.track.validate().context("Invalid track configuration")?;

    let trajectory = TrackSynthesizer::new(config.track.clone()).synthesize(distance, total_time, rng);
    tracing::info!(
        distance,
        points = trajectory.len(),
        duration_ms = trajectory.duration_ms(),
        "Generated trajectory"
    );

    super::print_json(&trajectory, pretty)?;
    Ok(std::process::ExitCode::SUCCESS)
}
