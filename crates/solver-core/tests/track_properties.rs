use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use slidetrack_solver_core::TrackSynthesizer;

proptest! {
    #[test]
    fn motion_ends_exactly_on_target(distance in 0u32..2000, budget in 1u64..10_000, seed in any::<u64>()) {
        let synth = TrackSynthesizer::with_defaults();
        let trajectory = synth.synthesize(distance, budget, &mut StdRng::seed_from_u64(seed));

        if distance == 0 {
            prop_assert!(trajectory.motion().is_empty());
        } else {
            prop_assert_eq!(trajectory.motion().last().unwrap().x, distance);
        }
        prop_assert!(trajectory.points().iter().all(|p| p.x <= distance));
        prop_assert_eq!(trajectory.final_x(), distance);
    }

    #[test]
    fn time_strictly_increases(distance in 0u32..2000, budget in 1u64..10_000, seed in any::<u64>()) {
        let synth = TrackSynthesizer::with_defaults();
        let trajectory = synth.synthesize(distance, budget, &mut StdRng::seed_from_u64(seed));

        prop_assert!(trajectory.points()[0].t > 0);
        for pair in trajectory.points().windows(2) {
            prop_assert!(pair[1].t > pair[0].t);
            prop_assert!(pair[1].x >= pair[0].x);
        }
    }

    #[test]
    fn motion_length_is_bounded(distance in 0u32..2000, seed in any::<u64>()) {
        let synth = TrackSynthesizer::with_defaults();
        let trajectory = synth.synthesize(distance, 1000, &mut StdRng::seed_from_u64(seed));

        // Minimum step is 5 px.
        let bound = (distance as usize).div_ceil(5);
        prop_assert!(trajectory.motion().len() <= bound);
        prop_assert_eq!(trajectory.settle().len(), 5);
    }

    #[test]
    fn identical_seeds_are_bit_identical(distance in 0u32..2000, budget in 1u64..10_000, seed in any::<u64>()) {
        let synth = TrackSynthesizer::with_defaults();
        let a = synth.synthesize(distance, budget, &mut StdRng::seed_from_u64(seed));
        let b = synth.synthesize(distance, budget, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn jitter_is_momentary(distance in 1u32..2000, seed in any::<u64>()) {
        let synth = TrackSynthesizer::with_defaults();
        let trajectory = synth.synthesize(distance, 1000, &mut StdRng::seed_from_u64(seed));

        prop_assert!(trajectory.motion().iter().all(|p| (-3..=3).contains(&p.y)));
        prop_assert!(trajectory.settle().iter().all(|p| p.y == 0));
    }
}
