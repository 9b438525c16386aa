//! Hierarchical state machines: nested states, orthogonal regions,
//! pseudo-states, history and deferred events.
//!
//! A [`Model`] is an immutable description of a state machine hierarchy,
//! declared through [`ModelBuilder`] and shared behind an `Arc`. Any number
//! of [`Instance`]s interpret the same model independently, each holding
//! its own active-state configuration and deferred-event pool. Triggers are
//! ordinary Rust values; transitions select them by type and optional
//! guard, first declared match wins.
//!
//! # Example
//!
//! A composite state whose child is replaced by a local transition, leaving
//! the composite itself entered throughout:
//!
//! ```rust
//! use std::sync::Arc;
//! use statechart::{Instance, ModelBuilder, PseudoStateKind, TransitionKind};
//!
//! let mut builder = ModelBuilder::new("model");
//! let root = builder.root();
//! let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial)?;
//! let state_a = builder.state("stateA", root);
//! let initial_a = builder.pseudo_state("initialA", state_a, PseudoStateKind::Initial)?;
//! let state_aa = builder.state("stateAA", state_a);
//! let state_ab = builder.state("stateAB", state_a);
//!
//! builder.transition(initial).to(state_a);
//! builder.transition(initial_a).to(state_aa);
//! builder
//!     .transition(state_a)
//!     .on::<String>()
//!     .when(|t: &String| t == "move")
//!     .kind(TransitionKind::Local)
//!     .to(state_ab);
//!
//! let model = Arc::new(builder.build()?);
//! let mut instance = Instance::new("instance", Arc::clone(&model))?;
//!
//! assert!(instance.is_active(state_aa));
//! instance.evaluate(String::from("move"))?;
//! assert!(instance.is_active(state_a));
//! assert!(instance.is_active(state_ab));
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! ```
//!
//! # Module layout
//!
//! - [`model`] — the immutable hierarchy and transition arena
//! - [`builder`] — fluent declaration and validation
//! - [`runtime`] — instances and the trigger evaluation engine
//! - [`observer`] — runtime tracing hooks and record export

pub mod builder;
pub mod model;
pub mod observer;
pub mod runtime;

pub use builder::{BuildError, ModelBuilder, TransitionBuilder};
pub use model::{
    ActionError, ElementId, Model, PseudoStateHandle, PseudoStateKind, RegionHandle, StateHandle,
    TransitionKind, Trigger, VertexHandle,
};
pub use observer::{NoopObserver, Observer, RecordingObserver, TraceKind, TraceRecord};
pub use runtime::{Completion, EvaluateError, Instance};
