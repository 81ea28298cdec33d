//! End-to-end solve pipeline.
//!
//! Request → decoded images → slider mask → gap offset → trajectory →
//! response. The horizontal offset of the best match is used directly as
//! the drag distance.

use chrono::{DateTime, Utc};
use rand::Rng;
use slidetrack_challenge_model::{ImageDimensions, SolveRequest, SolveResponse, Trajectory};
use slidetrack_common::{ResponseWindow, SlidetrackResult, SolverConfig, StageTimer};
use slidetrack_image_buffer::{decode_base64, DecodedImage, Mask};

use crate::gap_locator::{GapLocator, MatchError, MatchResult};
use crate::track_synth::TrackSynthesizer;

/// Result of solving one pair of images.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub background: ImageDimensions,
    pub slider: ImageDimensions,
    pub offset: MatchResult,
    pub trajectory: Trajectory,
}

/// Slider challenge solver.
///
/// Holds only immutable configuration and is safe to share between
/// requests; each call must be given its own random source.
pub struct Solver {
    config: SolverConfig,
    locator: GapLocator,
    synthesizer: TrackSynthesizer,
}

impl Solver {
    /// Create a solver, rejecting invalid configuration.
    pub fn new(config: SolverConfig) -> SlidetrackResult<Self> {
        config.validate()?;
        Ok(Self {
            locator: GapLocator::new(config.matching.clone()),
            synthesizer: TrackSynthesizer::new(config.track.clone()),
            config,
        })
    }

    pub fn with_defaults() -> Self {
        let config = SolverConfig::default();
        Self {
            locator: GapLocator::new(config.matching.clone()),
            synthesizer: TrackSynthesizer::new(config.track.clone()),
            config,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn locator(&self) -> &GapLocator {
        &self.locator
    }

    pub fn synthesizer(&self) -> &TrackSynthesizer {
        &self.synthesizer
    }

    /// Locate the gap for already-decoded images.
    pub fn locate(
        &self,
        background: &DecodedImage,
        slider: &DecodedImage,
    ) -> Result<MatchResult, MatchError> {
        let mask = self.slider_mask(background, slider)?;
        self.locator.locate(background.gray(), slider.gray(), &mask)
    }

    /// Score the slider at one placement.
    ///
    /// `None` if the placement is out of bounds or the window is flat.
    pub fn score_at(
        &self,
        background: &DecodedImage,
        slider: &DecodedImage,
        x: u32,
        y: u32,
    ) -> Result<Option<f64>, MatchError> {
        let mask = self.slider_mask(background, slider)?;
        self.locator.score_at(background.gray(), slider.gray(), &mask, x, y)
    }

    fn slider_mask(
        &self,
        background: &DecodedImage,
        slider: &DecodedImage,
    ) -> Result<Mask, MatchError> {
        // Dimension failures are reported before any mask work.
        if !background.dimensions().contains(&slider.dimensions()) {
            return Err(MatchError::SliderTooLarge {
                slider: slider.dimensions(),
                background: background.dimensions(),
            });
        }
        Ok(Mask::derive(slider, &self.config.mask))
    }

    /// Locate the gap and synthesize a drag to it.
    pub fn solve_images<R: Rng>(
        &self,
        background: &DecodedImage,
        slider: &DecodedImage,
        total_time_ms: u64,
        rng: &mut R,
    ) -> SlidetrackResult<Solution> {
        let timer = StageTimer::start();
        let offset = self.locate(background, slider)?;
        let locate_ms = timer.elapsed_ms();

        let trajectory = self.synthesizer.synthesize(offset.x, total_time_ms, rng);

        tracing::info!(
            x = offset.x,
            y = offset.y,
            score = offset.score,
            points = trajectory.len(),
            locate_ms,
            total_ms = timer.elapsed_ms(),
            "Solved slider challenge"
        );

        Ok(Solution {
            background: background.dimensions(),
            slider: slider.dimensions(),
            offset,
            trajectory,
        })
    }

    /// Solve a request body, stamping the response window from now.
    pub fn solve<R: Rng>(&self, request: &SolveRequest, rng: &mut R) -> SlidetrackResult<SolveResponse> {
        self.solve_at(request, Utc::now(), rng)
    }

    /// Solve a request body with an explicit window start.
    pub fn solve_at<R: Rng>(
        &self,
        request: &SolveRequest,
        start: DateTime<Utc>,
        rng: &mut R,
    ) -> SlidetrackResult<SolveResponse> {
        let request = request.validate(self.config.default_total_time_ms)?;
        let background = decode_base64(request.background_b64)?;
        let slider = decode_base64(request.slider_b64)?;

        let solution = self.solve_images(&background, &slider, request.total_time_ms, rng)?;
        let window = ResponseWindow::starting_at(start, request.total_time_ms);
        Ok(assemble_response(solution, &window))
    }
}

/// Package a solution and its time window into the reply body.
pub fn assemble_response(solution: Solution, window: &ResponseWindow) -> SolveResponse {
    SolveResponse {
        background_image_width: solution.background.width,
        background_image_height: solution.background.height,
        slider_image_width: solution.slider.width,
        slider_image_height: solution.slider.height,
        start_time: window.start_string(),
        end_time: window.end_string(),
        tracks: solution.trajectory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{generate, ChallengeSpec};
    use chrono::TimeZone;
    use image::{GrayImage, Luma};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use slidetrack_common::{Bounds, SlidetrackError};

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SolverConfig::default();
        config.track.step_px = Bounds::new(0, 3);
        assert!(matches!(
            Solver::new(config),
            Err(SlidetrackError::Config { .. })
        ));
    }

    #[test]
    fn test_oversized_slider_is_dimension_error() {
        let solver = Solver::with_defaults();
        let background = DecodedImage::from_planes(GrayImage::new(10, 10), None);
        let slider = DecodedImage::from_planes(GrayImage::new(11, 4), None);
        let err = solver
            .solve_images(&background, &slider, 1000, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SlidetrackError::Dimension { .. }));
    }

    #[test]
    fn test_black_slider_has_empty_mask() {
        let solver = Solver::with_defaults();
        let background = DecodedImage::from_planes(
            GrayImage::from_fn(30, 30, |x, y| Luma([((x * 7 + y * 13) % 251) as u8])),
            None,
        );
        let slider = DecodedImage::from_planes(GrayImage::new(8, 8), None);
        let err = solver
            .solve_images(&background, &slider, 1000, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SlidetrackError::Match { .. }));
        assert!(err.to_string().contains("no valid pixels"));
    }

    #[test]
    fn test_solve_images_on_synthetic_challenge() {
        let mut rng = StdRng::seed_from_u64(10);
        let challenge = generate(ChallengeSpec::default(), &mut rng).unwrap();
        let (background, slider) = challenge.decoded().unwrap();

        let solution = Solver::with_defaults()
            .solve_images(&background, &slider, 1000, &mut rng)
            .unwrap();
        assert_eq!(solution.offset.x, 150);
        assert_eq!(solution.offset.y, 70);
        assert_eq!(solution.trajectory.final_x(), 150);
    }

    #[test]
    fn test_score_at_agrees_with_locate() {
        let mut rng = StdRng::seed_from_u64(21);
        let challenge = generate(ChallengeSpec::default(), &mut rng).unwrap();
        let (background, slider) = challenge.decoded().unwrap();
        let solver = Solver::with_defaults();

        let best = solver.locate(&background, &slider).unwrap();
        let at_gap = solver
            .score_at(&background, &slider, best.x, best.y)
            .unwrap()
            .unwrap();
        assert_eq!(at_gap, best.score);

        let elsewhere = solver.score_at(&background, &slider, 10, 10).unwrap().unwrap();
        assert!(elsewhere < best.score);
        assert_eq!(solver.score_at(&background, &slider, 311, 0).unwrap(), None);
    }

    #[test]
    fn test_score_at_checks_dimensions_first() {
        let solver = Solver::with_defaults();
        let background = DecodedImage::from_planes(GrayImage::new(10, 10), None);
        let slider = DecodedImage::from_planes(GrayImage::new(11, 4), None);
        assert!(matches!(
            solver.score_at(&background, &slider, 0, 0),
            Err(MatchError::SliderTooLarge { .. })
        ));
    }

    #[test]
    fn test_response_window_uses_budget() {
        let mut rng = StdRng::seed_from_u64(4);
        let challenge = generate(ChallengeSpec::default(), &mut rng).unwrap();
        let request = challenge.to_request(1500).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let response = Solver::with_defaults()
            .solve_at(&request, start, &mut rng)
            .unwrap();
        assert_eq!(response.start_time, "2024-01-02T03:04:05.000000Z");
        assert_eq!(response.end_time, "2024-01-02T03:04:06.500000Z");
        assert_eq!(response.slider_image_width, 50);
        assert_eq!(response.background_image_width, 360);
    }

    #[test]
    fn test_missing_field_is_request_error() {
        let request = SolveRequest {
            background_b64: Some("AAAA".into()),
            ..SolveRequest::default()
        };
        let err = Solver::with_defaults()
            .solve(&request, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SlidetrackError::Request { .. }));
    }

    #[test]
    fn test_bad_base64_is_decode_error() {
        let request = SolveRequest::new("!!!", "!!!");
        let err = Solver::with_defaults()
            .solve(&request, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, SlidetrackError::Decode { .. }));
        assert_eq!(err.status_code(), 400);
    }
}
