//! The entry/exit protocol.
//!
//! Every hierarchy element enters in two halves, `enter_head` then
//! `enter_tail`, and leaves with `leave`. Heads run outermost-first along a
//! transition's enter span; only the innermost element runs its tail, which
//! cascades entry to children. Exit is strictly innermost-first: a state
//! leaves its child regions before running its own exit behaviour.

use crate::model::activation::Activation;
use crate::model::element::{ElementId, ElementKind, PseudoStateKind};
use crate::model::transition::{Transition, TransitionId};
use crate::model::Model;
use crate::observer::Observer;
use crate::runtime::evaluate::{accept, completion, SharedTrigger};
use crate::runtime::error::EvaluateError;
use crate::runtime::instance::Instance;

pub(crate) fn enter(
    model: &Model,
    observer: &dyn Observer,
    element: ElementId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
) -> Result<(), EvaluateError> {
    enter_head(model, observer, element, instance, deep_history, trigger, None)?;
    enter_tail(model, observer, element, instance, deep_history, trigger)
}

/// Activate an element. `next` is the next-inner element of a multi-element
/// enter span, present only when entering indirectly on the way to a deeper
/// target.
#[allow(clippy::too_many_arguments)]
pub(crate) fn enter_head(
    model: &Model,
    observer: &dyn Observer,
    element: ElementId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
    next: Option<ElementId>,
) -> Result<(), EvaluateError> {
    match &model.element(element).kind {
        ElementKind::Region(_) => {
            observer.entered(instance.name(), model.qualified_name_of(element));
            Ok(())
        }
        ElementKind::PseudoState(data) => {
            observer.entered(instance.name(), model.qualified_name_of(element));
            instance.set_vertex(element);
            if data.kind == PseudoStateKind::Terminate {
                instance.terminate();
            }
            Ok(())
        }
        ElementKind::State(data) => {
            // orthogonal sibling regions of the region continuing toward
            // the real target activate independently
            if next.is_some() {
                for &region in &data.regions {
                    if Some(region) != next {
                        enter(model, observer, region, instance, deep_history, trigger)?;
                    }
                }
            }

            observer.entered(instance.name(), model.qualified_name_of(element));
            instance.set_state(element);

            for behaviour in &data.entry {
                behaviour(trigger.as_ref()).map_err(|source| EvaluateError::Action {
                    element: model.qualified_name_of(element).to_string(),
                    source,
                })?;
            }
            Ok(())
        }
    }
}

pub(crate) fn enter_tail(
    model: &Model,
    observer: &dyn Observer,
    element: ElementId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
) -> Result<(), EvaluateError> {
    match &model.element(element).kind {
        ElementKind::Region(data) => {
            let configured = data.starting;
            let mut starting = configured;
            let mut deep = deep_history;

            // history semantics: re-enter the previously recorded state,
            // escalating to deep history for the remaining cascade if the
            // region starts at a deep history pseudo-state
            if deep || configured.is_some_and(|s| model.is_history(s)) {
                if let Some(current) = instance.get_state_id(element) {
                    starting = Some(current);
                    deep = deep
                        || configured
                            .is_some_and(|s| model.pseudo_kind(s) == Some(PseudoStateKind::DeepHistory));
                }
            }

            let starting = starting.ok_or_else(|| EvaluateError::NoStartingVertex {
                region: model.qualified_name_of(element).to_string(),
            })?;
            enter(model, observer, starting, instance, deep, trigger)
        }
        ElementKind::PseudoState(data) => {
            // every pseudo-state except a junction resolves forward
            // immediately; junction chains were resolved during traverse
            if data.kind != PseudoStateKind::Junction {
                accept(model, observer, element, instance, deep_history, trigger)?;
            }
            Ok(())
        }
        ElementKind::State(data) => {
            for &region in &data.regions {
                enter(model, observer, region, instance, deep_history, trigger)?;
            }
            completion(model, observer, element, instance, deep_history)
        }
    }
}

pub(crate) fn leave(
    model: &Model,
    observer: &dyn Observer,
    element: ElementId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
) -> Result<(), EvaluateError> {
    match &model.element(element).kind {
        ElementKind::Region(_) => {
            let occupant =
                instance
                    .get_vertex_id(element)
                    .ok_or_else(|| EvaluateError::NoActiveVertex {
                        region: model.qualified_name_of(element).to_string(),
                    })?;
            leave(model, observer, occupant, instance, deep_history, trigger)?;
            observer.left(instance.name(), model.qualified_name_of(element));
            Ok(())
        }
        ElementKind::PseudoState(_) => {
            observer.left(instance.name(), model.qualified_name_of(element));
            Ok(())
        }
        ElementKind::State(data) => {
            for &region in &data.regions {
                leave(model, observer, region, instance, deep_history, trigger)?;
            }
            observer.left(instance.name(), model.qualified_name_of(element));
            for behaviour in &data.exit {
                behaviour(trigger.as_ref()).map_err(|source| EvaluateError::Action {
                    element: model.qualified_name_of(element).to_string(),
                    source,
                })?;
            }
            Ok(())
        }
    }
}

/// Execute one transition: exit the source span, run the behaviour, enter
/// the target span.
pub(crate) fn execute(
    model: &Model,
    observer: &dyn Observer,
    transition: TransitionId,
    instance: &mut Instance,
    deep_history: bool,
    trigger: &SharedTrigger,
) -> Result<(), EvaluateError> {
    let t = model.transition(transition);
    observer.transition(instance.name(), &t.label);

    match &t.activation {
        Activation::External { to_exit, to_enter } => {
            leave(model, observer, *to_exit, instance, deep_history, trigger)?;
            run_actions(t, trigger)?;
            for (index, &element) in to_enter.iter().enumerate() {
                enter_head(
                    model,
                    observer,
                    element,
                    instance,
                    deep_history,
                    trigger,
                    to_enter.get(index + 1).copied(),
                )?;
            }
            if let Some(&innermost) = to_enter.last() {
                enter_tail(model, observer, innermost, instance, deep_history, trigger)?;
            }
            Ok(())
        }
        Activation::Local { target } => {
            // the boundary depends on which ancestor is currently active
            let vertex = resolve_local_target(model, instance, *target);
            if is_active(model, instance, vertex) {
                // self-transition on an active composite: recycle its child
                // regions without crossing the composite's own boundary
                if let Some(data) = model.state_data(vertex) {
                    for &region in &data.regions {
                        leave(model, observer, region, instance, deep_history, trigger)?;
                    }
                }
                run_actions(t, trigger)?;
                if let Some(data) = model.state_data(vertex) {
                    for &region in &data.regions {
                        enter(model, observer, region, instance, deep_history, trigger)?;
                    }
                }
                completion(model, observer, vertex, instance, deep_history)
            } else {
                if let Some(region) = model.parent(vertex) {
                    let occupant = instance.get_vertex_id(region).ok_or_else(|| {
                        EvaluateError::NoActiveVertex {
                            region: model.qualified_name_of(region).to_string(),
                        }
                    })?;
                    leave(model, observer, occupant, instance, deep_history, trigger)?;
                }
                run_actions(t, trigger)?;
                enter(model, observer, vertex, instance, deep_history, trigger)
            }
        }
        Activation::Internal { source } => {
            run_actions(t, trigger)?;
            // no state was entered, so the usual post-entry completion
            // check must run here
            completion(model, observer, *source, instance, deep_history)
        }
    }
}

fn run_actions(transition: &Transition, trigger: &SharedTrigger) -> Result<(), EvaluateError> {
    for behaviour in &transition.actions {
        behaviour(trigger.as_ref()).map_err(|source| EvaluateError::Action {
            element: transition.label.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Walk from the local transition's target toward the root until the next
/// ancestor state is already active; that vertex is what must be entered.
fn resolve_local_target(model: &Model, instance: &Instance, target: ElementId) -> ElementId {
    let mut vertex = target;
    while let Some(region) = model.parent(vertex) {
        match model.parent(region) {
            Some(owner) if !is_active(model, instance, owner) => vertex = owner,
            _ => break,
        }
    }
    vertex
}

/// A vertex is active iff it is the root or its parent region records it as
/// the active vertex and that chain is itself active.
pub(crate) fn is_active(model: &Model, instance: &Instance, vertex: ElementId) -> bool {
    match model.parent(vertex) {
        None => true,
        Some(region) => {
            instance.get_vertex_id(region) == Some(vertex)
                && model
                    .parent(region)
                    .map_or(true, |owner| is_active(model, instance, owner))
        }
    }
}
