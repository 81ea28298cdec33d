use rand::rngs::StdRng;
use rand::SeedableRng;

use slidetrack_challenge_model::SolveRequest;
use slidetrack_common::SlidetrackError;
use slidetrack_image_buffer::{encode_png_base64, Mask};
use slidetrack_solver_core::synthetic::{generate, ChallengeSpec};
use slidetrack_solver_core::{GapLocator, MatchError, Solver};

fn default_challenge(seed: u64) -> slidetrack_solver_core::synthetic::SyntheticChallenge {
    let mut rng = StdRng::seed_from_u64(seed);
    generate(ChallengeSpec::default(), &mut rng).expect("default spec fits")
}

#[test]
fn request_round_trip_finds_gap_and_drags_to_it() {
    let challenge = default_challenge(2024);
    let body = serde_json::to_string(&challenge.to_request(1000).unwrap()).unwrap();

    let request = SolveRequest::from_json(&body).unwrap();
    let response = Solver::with_defaults()
        .solve(&request, &mut StdRng::seed_from_u64(99))
        .unwrap();

    assert_eq!(response.background_image_width, 360);
    assert_eq!(response.background_image_height, 200);
    assert_eq!(response.slider_image_width, 50);
    assert_eq!(response.slider_image_height, 50);

    let tracks = &response.tracks;
    assert_eq!(tracks.final_x(), 150);
    assert_eq!(tracks.motion().last().unwrap().x, 150);
    assert!(tracks.is_well_ordered());

    assert_eq!(tracks.settle().len(), 5);
    assert!(tracks.settle().iter().all(|p| p.x == 150 && p.y == 0));
}

#[test]
fn gap_found_with_near_maximal_score() {
    let challenge = default_challenge(7);
    let (background, slider) = challenge.decoded().unwrap();

    let offset = Solver::with_defaults().locate(&background, &slider).unwrap();
    assert_eq!((offset.x, offset.y), (150, 70));
    assert!(offset.score > 0.98, "score {}", offset.score);
}

#[test]
fn gap_found_across_positions() {
    for (i, (gap_x, gap_y)) in [(0, 0), (61, 12), (230, 140), (310, 150)].into_iter().enumerate() {
        let spec = ChallengeSpec {
            gap_x,
            gap_y,
            ..ChallengeSpec::default()
        };
        let mut rng = StdRng::seed_from_u64(100 + i as u64);
        let challenge = generate(spec, &mut rng).unwrap();
        let (background, slider) = challenge.decoded().unwrap();

        let offset = Solver::with_defaults().locate(&background, &slider).unwrap();
        assert_eq!((offset.x, offset.y), (gap_x, gap_y), "gap at ({gap_x}, {gap_y})");
    }
}

#[test]
fn fully_transparent_slider_is_a_match_error() {
    let challenge = default_challenge(3);
    let (background, slider) = challenge.decoded().unwrap();

    let empty = Mask::empty(slider.width(), slider.height());
    let err = GapLocator::with_defaults()
        .locate(background.gray(), slider.gray(), &empty)
        .unwrap_err();
    assert_eq!(err, MatchError::EmptyMask);

    let mut transparent = challenge.slider.clone();
    for pixel in transparent.pixels_mut() {
        pixel[3] = 0;
    }
    let request = SolveRequest::new(
        encode_png_base64(&image::DynamicImage::ImageRgb8(challenge.background.clone())).unwrap(),
        encode_png_base64(&image::DynamicImage::ImageRgba8(transparent)).unwrap(),
    );
    let err = Solver::with_defaults()
        .solve(&request, &mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, SlidetrackError::Match { .. }));
    assert_eq!(err.cause::<MatchError>(), Some(&MatchError::EmptyMask));
}

#[test]
fn swapped_images_are_a_dimension_error() {
    let challenge = default_challenge(5);
    let request = challenge.to_request(1000).unwrap();
    let swapped = SolveRequest {
        background_b64: request.slider_b64.clone(),
        slider_b64: request.background_b64.clone(),
        total_time: request.total_time,
    };

    let err = Solver::with_defaults()
        .solve(&swapped, &mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, SlidetrackError::Dimension { .. }));
    assert!(matches!(
        err.cause::<MatchError>(),
        Some(MatchError::SliderTooLarge { .. })
    ));
}

#[test]
fn same_seed_same_response_tracks() {
    let challenge = default_challenge(11);
    let request = challenge.to_request(800).unwrap();
    let solver = Solver::with_defaults();

    let a = solver.solve(&request, &mut StdRng::seed_from_u64(5)).unwrap();
    let b = solver.solve(&request, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(a.tracks, b.tracks);
}
