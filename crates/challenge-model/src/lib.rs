//! Slidetrack Challenge Model
//!
//! Defines the data contracts that cross the solver boundary:
//! - **Track:** Drag trajectory points and the two-phase trajectory
//! - **Request:** The JSON body naming the two transport-encoded images
//! - **Response:** Image dimensions, the drag window, and the trajectory
//!
//! Field names on the wire follow the challenge service's camelCase and
//! lowercase conventions; Rust names stay snake_case.

pub mod request;
pub mod response;
pub mod track;

pub use request::*;
pub use response::*;
pub use track::*;
