//! Fluent API for declaring state machine models.
//!
//! [`ModelBuilder`] owns the arena while the hierarchy and its transitions
//! are declared; [`build`](ModelBuilder::build) validates the structure,
//! precomputes transition activations and freezes the result into an
//! immutable [`Model`](crate::model::Model).

pub mod error;
pub mod model;
pub mod transition;

pub use error::BuildError;
pub use model::ModelBuilder;
pub use transition::TransitionBuilder;
