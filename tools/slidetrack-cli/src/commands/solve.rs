//! Solve a challenge and print the response.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use rand::rngs::StdRng;
use slidetrack_challenge_model::{ErrorResponse, SolveRequest};
use slidetrack_common::{ResponseWindow, SlidetrackError, SlidetrackResult, SolverConfig};
use slidetrack_image_buffer::decode_file;
use slidetrack_solver_core::solve::assemble_response;
use slidetrack_solver_core::Solver;

/// Where the challenge comes from.
pub enum Input {
    /// A request body file ("-" for stdin).
    Request(PathBuf),
    /// Two image files on disk.
    Images {
        background: PathBuf,
        slider: PathBuf,
        total_time: Option<u64>,
    },
}

pub fn run(
    input: Input,
    config: &SolverConfig,
    pretty: bool,
    rng: &mut StdRng,
) -> anyhow::Result<ExitCode> {
    let solver = Solver::new(config.clone()).context("Invalid solver configuration")?;

    let outcome = match input {
        Input::Request(path) => read_request(&path).and_then(|r| solver.solve(&r, rng)),
        Input::Images {
            background,
            slider,
            total_time,
        } => solve_files(&solver, &background, &slider, total_time, rng),
    };

    match outcome {
        Ok(response) => {
            super::print_json(&response, pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::warn!(status = err.status_code(), "Solve failed: {err}");
            super::print_json(&ErrorResponse::from(&err), pretty)?;
            Ok(ExitCode::from(2))
        }
    }
}

fn read_request(path: &Path) -> SlidetrackResult<SolveRequest> {
    let body = if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        body
    } else {
        if !path.exists() {
            return Err(SlidetrackError::FileNotFound { path: path.to_path_buf() });
        }
        std::fs::read_to_string(path)?
    };
    Ok(SolveRequest::from_json(&body)?)
}

fn solve_files(
    solver: &Solver,
    background: &Path,
    slider: &Path,
    total_time: Option<u64>,
    rng: &mut StdRng,
) -> SlidetrackResult<slidetrack_challenge_model::SolveResponse> {
    let total_time = total_time.unwrap_or(solver.config().default_total_time_ms);
    if total_time == 0 {
        return Err(SlidetrackError::request("total time must be positive"));
    }

    let background = decode_file(background)?;
    let slider = decode_file(slider)?;
    let solution = solver.solve_images(&background, &slider, total_time, rng)?;
    Ok(assemble_response(solution, &ResponseWindow::starting_now(total_time)))
}
