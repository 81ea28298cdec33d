//! Slidetrack Solver Core
//!
//! Answers slider challenges from decoded image data:
//! - **Gap Locator:** Masked normalized correlation to find the gap offset
//! - **Track Synthesizer:** Human-like drag trajectory over that offset
//! - **Solve:** Request → images → offset → trajectory → response
//! - **Synthetic:** Generated challenges with a known gap, for testing
//!
//! This crate is pure computation apart from reading the wall clock for
//! response timestamps. Randomness is always passed in by the caller;
//! nothing here touches a shared generator.

pub mod gap_locator;
pub mod solve;
pub mod synthetic;
pub mod track_synth;

pub use gap_locator::{GapLocator, MatchError, MatchResult};
pub use solve::{Solution, Solver};
pub use track_synth::TrackSynthesizer;
