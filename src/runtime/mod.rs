//! Trigger evaluation against running instances.
//!
//! The engine is a set of free functions recursing over the model arena;
//! all mutable state lives in the [`Instance`] they are handed. Evaluation
//! is synchronous and run-to-completion: `Instance::evaluate` returns only
//! once the trigger, any junction chains, completion transitions and
//! deferred-event redelivery have all settled.

pub mod error;
pub mod instance;

pub(crate) mod entry;
pub(crate) mod evaluate;

pub use error::EvaluateError;
pub use evaluate::Completion;
pub use instance::Instance;
