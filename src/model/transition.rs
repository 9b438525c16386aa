//! Transitions: possible reactions of a vertex to a trigger.
//!
//! A transition pairs a runtime-type test and a guard predicate with a list
//! of effect actions and a precomputed [`Activation`] describing the span of
//! the hierarchy it exits and enters. All of this is fixed at build time;
//! evaluation only reads it.

use std::any::{Any, TypeId};

use crate::model::activation::Activation;
use crate::model::element::ElementId;

/// A type-erased trigger event.
///
/// Triggers are matched by their runtime type; any `'static` value can act
/// as an event. Guards and actions downcast to the concrete type they were
/// declared for.
pub type Trigger = dyn Any + Send + Sync;

/// Error produced by a user action callback.
///
/// Propagated out of [`Instance::evaluate`](crate::runtime::Instance::evaluate)
/// wrapped in [`EvaluateError::Action`](crate::runtime::EvaluateError); the
/// active configuration is left exactly as far as it had progressed.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) type GuardFn = Box<dyn Fn(&Trigger) -> bool + Send + Sync>;
pub(crate) type ActionFn = Box<dyn Fn(&Trigger) -> Result<(), ActionError> + Send + Sync>;

/// Identifier of a transition within its model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionId(pub(crate) usize);

impl TransitionId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A transition's kind defines its boundary semantics when traversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Exits the source's span up to, but not including, the lowest common
    /// ancestor of source and target, then enters the target's span.
    #[default]
    External,
    /// Runs the transition behaviour without any change to the active
    /// configuration.
    Internal,
    /// Like external, but the common ancestor itself is never exited or
    /// re-entered; the boundary depends on the configuration at traversal
    /// time.
    Local,
}

pub(crate) struct Transition {
    pub(crate) source: ElementId,
    pub(crate) target: Option<ElementId>,
    pub(crate) kind: TransitionKind,
    /// Runtime type a trigger must have for this transition to be
    /// considered; `None` matches any trigger, which is how completion
    /// transitions are declared.
    pub(crate) trigger_type: Option<TypeId>,
    pub(crate) guard: Option<GuardFn>,
    pub(crate) actions: Vec<ActionFn>,
    pub(crate) activation: Activation,
    /// Human-readable description used by the observability sink.
    pub(crate) label: String,
}

impl Transition {
    /// First-match-wins eligibility test: the trigger's runtime type must
    /// match and the guard, if any, must pass.
    pub(crate) fn matches(&self, trigger: &Trigger) -> bool {
        if let Some(required) = self.trigger_type {
            if required != trigger.type_id() {
                return false;
            }
        }
        match &self.guard {
            Some(guard) => guard(trigger),
            None => true,
        }
    }
}
