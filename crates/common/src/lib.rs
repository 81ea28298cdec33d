//! Slidetrack Common Utilities
//!
//! Shared infrastructure for all Slidetrack crates:
//! - Error types and result aliases
//! - UTC timestamp formatting for response windows
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
