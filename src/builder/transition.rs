//! Fluent declaration of a single transition.

use std::any::{Any, TypeId};

use crate::builder::model::{ModelBuilder, PendingTransition};
use crate::model::element::{ElementId, VertexHandle};
use crate::model::transition::{ActionError, ActionFn, GuardFn, TransitionKind, Trigger};

/// Builder for one transition, obtained from
/// [`ModelBuilder::transition`](crate::builder::ModelBuilder::transition).
///
/// A transition without [`on`](TransitionBuilder::on) matches any trigger,
/// including the synthetic completion trigger; that is how completion
/// transitions are declared. Declaration finishes with
/// [`to`](TransitionBuilder::to) or [`internal`](TransitionBuilder::internal).
///
/// # Example
///
/// ```rust
/// use statechart::{ModelBuilder, PseudoStateKind};
///
/// struct Submit;
///
/// let mut builder = ModelBuilder::new("model");
/// let root = builder.root();
/// let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial)?;
/// let draft = builder.state("draft", root);
/// let sent = builder.state("sent", root);
///
/// builder.transition(initial).to(draft);
/// builder
///     .transition(draft)
///     .on::<Submit>()
///     .action(|| println!("submitting"))
///     .to(sent);
///
/// let model = builder.build()?;
/// # let _ = model;
/// # Ok::<(), statechart::BuildError>(())
/// ```
pub struct TransitionBuilder<'a> {
    builder: &'a mut ModelBuilder,
    source: ElementId,
    kind: TransitionKind,
    trigger_type: Option<TypeId>,
    guard: Option<GuardFn>,
    actions: Vec<ActionFn>,
}

impl<'a> TransitionBuilder<'a> {
    pub(crate) fn new(builder: &'a mut ModelBuilder, source: ElementId) -> Self {
        TransitionBuilder {
            builder,
            source,
            kind: TransitionKind::default(),
            trigger_type: None,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Restrict the transition to triggers of runtime type `T`.
    pub fn on<T: Any>(mut self) -> Self {
        self.trigger_type = Some(TypeId::of::<T>());
        self
    }

    /// Guard the transition with a pure predicate over the trigger value.
    ///
    /// The guard fails for triggers that are not a `T`.
    pub fn when<T, F>(mut self, guard: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Box::new(move |trigger: &Trigger| {
            trigger.downcast_ref::<T>().is_some_and(|t| guard(t))
        }));
        self
    }

    /// Guard the transition with a predicate over the type-erased trigger.
    pub fn when_any<F>(mut self, guard: F) -> Self
    where
        F: Fn(&Trigger) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Append a behaviour to run while the transition is traversed.
    pub fn action<F>(mut self, behaviour: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.push(Box::new(move |_| {
            behaviour();
            Ok(())
        }));
        self
    }

    /// Append a behaviour receiving the trigger that caused the traversal;
    /// skipped for triggers that are not a `T`.
    pub fn action_on<T, F>(mut self, behaviour: F) -> Self
    where
        T: Any,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.actions.push(Box::new(move |trigger: &Trigger| {
            if let Some(t) = trigger.downcast_ref::<T>() {
                behaviour(t);
            }
            Ok(())
        }));
        self
    }

    /// Append a fallible behaviour; an error aborts the evaluation with the
    /// configuration left as far as it had progressed.
    pub fn try_action<F>(mut self, behaviour: F) -> Self
    where
        F: Fn() -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.actions.push(Box::new(move |_| behaviour()));
        self
    }

    /// Override the transition kind (external by default).
    pub fn kind(mut self, kind: TransitionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Finish the declaration with a target vertex.
    pub fn to(self, target: impl Into<VertexHandle>) {
        let target = target.into().id();
        self.builder.add_transition(PendingTransition {
            source: self.source,
            target: Some(target),
            kind: self.kind,
            trigger_type: self.trigger_type,
            guard: self.guard,
            actions: self.actions,
        });
    }

    /// Finish the declaration as an internal transition: behaviour only, no
    /// change to the active configuration.
    pub fn internal(self) {
        self.builder.add_transition(PendingTransition {
            source: self.source,
            target: None,
            kind: TransitionKind::Internal,
            trigger_type: self.trigger_type,
            guard: self.guard,
            actions: self.actions,
        });
    }
}
