//! The evaluation engine.
//!
//! Stateless recursion over an instance's active configuration: a trigger
//! is delegated depth-first to the active states of child regions, then
//! offered to the state itself, then to its deferrable-trigger list. The
//! first vertex that matches wins; orthogonal regions may each consume the
//! same trigger independently.

use std::any::Any;
use std::sync::Arc;

use crate::model::element::{ElementId, PseudoStateKind, StateHandle};
use crate::model::transition::TransitionId;
use crate::model::Model;
use crate::observer::Observer;
use crate::runtime::entry::execute;
use crate::runtime::error::EvaluateError;
use crate::runtime::instance::Instance;

/// A type-erased trigger shared between the evaluation stack and the
/// deferred-event pool.
pub(crate) type SharedTrigger = Arc<dyn Any + Send + Sync>;

/// Synthetic trigger used to evaluate completion transitions.
///
/// Offered to a composite state whenever all of its child regions report a
/// final configuration. Transitions declared without
/// [`on`](crate::builder::TransitionBuilder::on) match it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// The state whose children completed.
    pub state: StateHandle,
}

/// Evaluate a trigger against a state, returning true if it was consumed.
pub(crate) fn evaluate(
    model: &Model,
    observer: &dyn Observer,
    state: ElementId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
) -> Result<bool, EvaluateError> {
    let mut consumed = delegate(model, observer, state, instance, deep_history, trigger)?;
    if !consumed {
        consumed = accept(model, observer, state, instance, deep_history, trigger)?;
    }
    if !consumed {
        consumed = defer(model, state, instance, trigger);
    }

    // completion transitions become eligible if the trigger caused a
    // transition and this state is still active
    if consumed {
        if let Some(region) = model.parent(state) {
            if instance.get_state_id(region) == Some(state) {
                completion(model, observer, state, instance, deep_history)?;
            }
        }
    }

    Ok(consumed)
}

/// Delegate a trigger to the active states of child regions.
fn delegate(
    model: &Model,
    observer: &dyn Observer,
    state: ElementId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
) -> Result<bool, EvaluateError> {
    let mut consumed = false;
    let Some(data) = model.state_data(state) else {
        return Ok(false);
    };
    for &region in &data.regions {
        let Some(active) = instance.get_state_id(region) else {
            continue;
        };
        if evaluate(model, observer, active, instance, deep_history, trigger)? {
            consumed = true;

            // a child transition may have exited this state as a side
            // effect; it can no longer receive the trigger
            if let Some(parent) = model.parent(state) {
                if instance.get_state_id(parent) != Some(state) {
                    break;
                }
            }
        }
    }
    Ok(consumed)
}

/// Offer a trigger to a vertex's own transitions; traverse the first match.
pub(crate) fn accept(
    model: &Model,
    observer: &dyn Observer,
    vertex: ElementId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
) -> Result<bool, EvaluateError> {
    match model.transition_for(vertex, trigger.as_ref()) {
        Some(transition) => {
            traverse(model, observer, transition, instance, deep_history, trigger)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Absorb a trigger into the deferred pool if the state declares its type
/// deferrable.
fn defer(model: &Model, state: ElementId, instance: &mut Instance, trigger: &SharedTrigger) -> bool {
    let deferrable = model
        .state_data(state)
        .is_some_and(|data| data.deferrable.contains(&trigger.as_ref().type_id()));
    if deferrable {
        instance.defer(trigger);
    }
    deferrable
}

/// Resolve any junction chain into an ordered list of transitions, then
/// execute them source-to-target.
pub(crate) fn traverse(
    model: &Model,
    observer: &dyn Observer,
    transition: TransitionId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
) -> Result<(), EvaluateError> {
    let mut chain = vec![transition];
    let mut visited: Vec<ElementId> = Vec::new();
    let mut current = transition;

    while let Some(junction) = junction_target(model, current) {
        if visited.contains(&junction) {
            return Err(EvaluateError::JunctionCycle {
                junction: model.qualified_name_of(junction).to_string(),
            });
        }
        visited.push(junction);
        current = model.transition_for(junction, trigger.as_ref()).ok_or_else(|| {
            EvaluateError::UnresolvedJunction {
                junction: model.qualified_name_of(junction).to_string(),
            }
        })?;
        chain.push(current);
    }

    for transition in chain {
        execute(model, observer, transition, instance, deep_history, trigger)?;
    }
    Ok(())
}

fn junction_target(model: &Model, transition: TransitionId) -> Option<ElementId> {
    let target = model.transition(transition).target?;
    (model.pseudo_kind(target) == Some(PseudoStateKind::Junction)).then_some(target)
}

/// Fire a completion transition if every child region's active state
/// reports a final configuration.
pub(crate) fn completion(
    model: &Model,
    observer: &dyn Observer,
    state: ElementId,
    instance: &mut Instance,
    deep_history: bool,
) -> Result<(), EvaluateError> {
    let Some(data) = model.state_data(state) else {
        return Ok(());
    };
    for &region in &data.regions {
        let settled = instance
            .get_state_id(region)
            .is_some_and(|active| instance.is_final_id(active));
        if !settled {
            return Ok(());
        }
    }

    let trigger: SharedTrigger = Arc::new(Completion {
        state: StateHandle(state),
    });
    accept(model, observer, state, instance, deep_history, &trigger)?;
    Ok(())
}
