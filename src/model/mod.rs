//! The immutable model: hierarchy elements and their transitions.
//!
//! A model is built once, then interpreted repeatedly and independently by
//! any number of [`Instance`](crate::runtime::Instance)s:
//! - [`Model`] — arena of regions, states and pseudo-states
//! - [`TransitionKind`] — external, internal or local boundary semantics
//! - [`PseudoStateKind`] — structural routing roles
//!
//! Nothing in this module is mutated after
//! [`ModelBuilder::build`](crate::builder::ModelBuilder::build) returns.

pub(crate) mod activation;
pub(crate) mod element;
pub(crate) mod transition;
mod tree;

pub use element::{
    ElementId, PseudoStateHandle, PseudoStateKind, RegionHandle, StateHandle, VertexHandle,
};
pub use transition::{ActionError, TransitionKind, Trigger};
pub use tree::Model;
