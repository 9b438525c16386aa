//! Fluent construction of state machine models.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::model::activation::Activation;
use crate::model::element::{
    Element, ElementId, ElementKind, PseudoStateData, PseudoStateHandle, PseudoStateKind,
    RegionData, RegionHandle, StateData, StateHandle, VertexHandle,
};
use crate::model::transition::{
    ActionError, ActionFn, GuardFn, Transition, TransitionId, TransitionKind,
};
use crate::model::Model;
use crate::observer::Observer;

/// A transition as declared, before activation precomputation.
pub(crate) struct PendingTransition {
    pub(crate) source: ElementId,
    pub(crate) target: Option<ElementId>,
    pub(crate) kind: TransitionKind,
    pub(crate) trigger_type: Option<TypeId>,
    pub(crate) guard: Option<GuardFn>,
    pub(crate) actions: Vec<ActionFn>,
}

/// Builder for [`Model`]s.
///
/// Child states created with [`state`](ModelBuilder::state) live in their
/// parent's implicit default region; orthogonal behaviour needs explicit
/// [`region`](ModelBuilder::region) calls. An `Initial` or history
/// pseudo-state registers itself as its region's starting vertex.
///
/// # Example
///
/// ```rust
/// use statechart::{ModelBuilder, PseudoStateKind, TransitionKind};
///
/// let mut builder = ModelBuilder::new("model");
/// let root = builder.root();
/// let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial)?;
/// let a = builder.state("stateA", root);
/// let initial_a = builder.pseudo_state("initialA", a, PseudoStateKind::Initial)?;
/// let aa = builder.state("stateAA", a);
/// let ab = builder.state("stateAB", a);
///
/// builder.transition(initial).to(a);
/// builder.transition(initial_a).to(aa);
/// builder
///     .transition(a)
///     .on::<String>()
///     .when(|t: &String| t == "move")
///     .kind(TransitionKind::Local)
///     .to(ab);
///
/// let model = builder.build()?;
/// # let _ = model;
/// # Ok::<(), statechart::BuildError>(())
/// ```
pub struct ModelBuilder {
    elements: Vec<Element>,
    pending: Vec<PendingTransition>,
    region_count: usize,
    root: ElementId,
    observer: Option<Arc<dyn Observer>>,
}

impl ModelBuilder {
    /// Start a model whose root state carries the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::create(name, None)
    }

    /// Start a model, reporting `Create` events for every element to the
    /// given observer.
    pub fn with_observer(name: impl Into<String>, observer: Arc<dyn Observer>) -> Self {
        Self::create(name, Some(observer))
    }

    fn create(name: impl Into<String>, observer: Option<Arc<dyn Observer>>) -> Self {
        let mut builder = ModelBuilder {
            elements: Vec::new(),
            pending: Vec::new(),
            region_count: 0,
            root: ElementId(0),
            observer,
        };
        builder.root = builder.push_element(name.into(), None, ElementKind::State(StateData::new()));
        builder
    }

    /// The root state.
    pub fn root(&self) -> StateHandle {
        StateHandle(self.root)
    }

    /// Add a child state to `parent`'s default region.
    pub fn state(&mut self, name: impl Into<String>, parent: StateHandle) -> StateHandle {
        let region = self.default_region(parent.0);
        self.state_in(name, RegionHandle(region))
    }

    /// Add a child state to an explicit region.
    pub fn state_in(&mut self, name: impl Into<String>, region: RegionHandle) -> StateHandle {
        let id = self.push_element(
            name.into(),
            Some(region.0),
            ElementKind::State(StateData::new()),
        );
        self.region_data_mut(region.0).vertices.push(id);
        StateHandle(id)
    }

    /// Add an orthogonal region to a state.
    pub fn region(&mut self, name: impl Into<String>, parent: StateHandle) -> RegionHandle {
        let slot = self.region_count;
        self.region_count += 1;
        let id = self.push_element(
            name.into(),
            Some(parent.0),
            ElementKind::Region(RegionData {
                vertices: Vec::new(),
                starting: None,
                slot,
            }),
        );
        self.state_data_mut(parent.0).regions.push(id);
        RegionHandle(id)
    }

    /// Add a pseudo-state to `parent`'s default region.
    ///
    /// An `Initial`, `ShallowHistory` or `DeepHistory` pseudo-state becomes
    /// the region's starting vertex; a second one is a build error.
    pub fn pseudo_state(
        &mut self,
        name: impl Into<String>,
        parent: StateHandle,
        kind: PseudoStateKind,
    ) -> Result<PseudoStateHandle, BuildError> {
        let region = self.default_region(parent.0);
        self.pseudo_state_in(name, RegionHandle(region), kind)
    }

    /// Add a pseudo-state to an explicit region.
    pub fn pseudo_state_in(
        &mut self,
        name: impl Into<String>,
        region: RegionHandle,
        kind: PseudoStateKind,
    ) -> Result<PseudoStateHandle, BuildError> {
        let id = self.push_element(
            name.into(),
            Some(region.0),
            ElementKind::PseudoState(PseudoStateData {
                kind,
                outgoing: Vec::new(),
            }),
        );
        let starting = {
            let data = self.region_data_mut(region.0);
            data.vertices.push(id);
            data.starting
        };
        if kind.is_starting() {
            if let Some(existing) = starting {
                return Err(BuildError::DuplicateStartingVertex {
                    region: self.elements[region.0.index()].qualified_name.clone(),
                    existing: self.elements[existing.index()].name.clone(),
                });
            }
            self.region_data_mut(region.0).starting = Some(id);
        }
        Ok(PseudoStateHandle(id))
    }

    /// Run `behaviour` whenever `state` is entered.
    pub fn on_entry<F>(&mut self, state: StateHandle, behaviour: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state_data_mut(state.0).entry.push(Box::new(move |_| {
            behaviour();
            Ok(())
        }));
    }

    /// Fallible entry behaviour; an error aborts the evaluation that
    /// triggered the entry.
    pub fn try_on_entry<F>(&mut self, state: StateHandle, behaviour: F)
    where
        F: Fn() -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.state_data_mut(state.0)
            .entry
            .push(Box::new(move |_| behaviour()));
    }

    /// Run `behaviour` whenever `state` is exited.
    pub fn on_exit<F>(&mut self, state: StateHandle, behaviour: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state_data_mut(state.0).exit.push(Box::new(move |_| {
            behaviour();
            Ok(())
        }));
    }

    /// Fallible exit behaviour.
    pub fn try_on_exit<F>(&mut self, state: StateHandle, behaviour: F)
    where
        F: Fn() -> Result<(), ActionError> + Send + Sync + 'static,
    {
        self.state_data_mut(state.0)
            .exit
            .push(Box::new(move |_| behaviour()));
    }

    /// Declare that `state` defers triggers of type `T` into the
    /// instance's deferred pool instead of ignoring them.
    pub fn defer_trigger<T: Any>(&mut self, state: StateHandle) {
        self.state_data_mut(state.0)
            .deferrable
            .push(TypeId::of::<T>());
    }

    /// Begin declaring a transition from `source`.
    pub fn transition(&mut self, source: impl Into<VertexHandle>) -> TransitionBuilder<'_> {
        TransitionBuilder::new(self, source.into().id())
    }

    /// Validate the declared model and precompute every transition's
    /// activation, producing an immutable [`Model`].
    pub fn build(self) -> Result<Model, BuildError> {
        let ModelBuilder {
            mut elements,
            pending,
            region_count,
            root,
            ..
        } = self;

        for element in &elements {
            match &element.kind {
                ElementKind::Region(data) => {
                    if data.starting.is_none() {
                        return Err(BuildError::MissingStartingVertex {
                            region: element.qualified_name.clone(),
                        });
                    }
                }
                ElementKind::PseudoState(data) => {
                    if data.kind != PseudoStateKind::Terminate && data.outgoing.is_empty() {
                        return Err(BuildError::DanglingPseudoState {
                            pseudo_state: element.qualified_name.clone(),
                        });
                    }
                }
                ElementKind::State(_) => {}
            }
        }

        if let Some(junction) = junction_cycle(&elements, &pending) {
            return Err(BuildError::JunctionCycle {
                junction: elements[junction.index()].qualified_name.clone(),
            });
        }

        let mut transitions = Vec::with_capacity(pending.len());
        for p in pending {
            let activation = match (p.kind, p.target) {
                (TransitionKind::Internal, _) | (_, None) => {
                    if !matches!(elements[p.source.index()].kind, ElementKind::State(_)) {
                        return Err(BuildError::InternalFromPseudoState {
                            vertex: elements[p.source.index()].qualified_name.clone(),
                        });
                    }
                    Activation::Internal { source: p.source }
                }
                (TransitionKind::External, Some(target)) => {
                    // an ancestor target has no enter span below the common
                    // ancestor; only the local kind can express it
                    let mut ancestor = elements[p.source.index()].parent;
                    while let Some(id) = ancestor {
                        if id == target {
                            return Err(BuildError::ExternalTargetIsAncestor {
                                vertex: elements[p.source.index()].qualified_name.clone(),
                                ancestor: elements[target.index()].qualified_name.clone(),
                            });
                        }
                        ancestor = elements[id.index()].parent;
                    }
                    Activation::external(&elements, p.source, target)
                }
                (TransitionKind::Local, Some(target)) => Activation::Local { target },
            };
            let label = match p.target {
                Some(target) => format!(
                    "{} -> {}",
                    elements[p.source.index()].qualified_name,
                    elements[target.index()].qualified_name
                ),
                None => format!("{} (internal)", elements[p.source.index()].qualified_name),
            };
            transitions.push(Transition {
                source: p.source,
                target: p.target,
                kind: p.kind,
                trigger_type: p.trigger_type,
                guard: p.guard,
                actions: p.actions,
                activation,
                label,
            });
        }

        elements.shrink_to_fit();
        Ok(Model {
            elements,
            transitions,
            root,
            region_count,
        })
    }

    pub(crate) fn add_transition(&mut self, pending: PendingTransition) -> TransitionId {
        let id = TransitionId(self.pending.len());
        match &mut self.elements[pending.source.index()].kind {
            ElementKind::State(data) => data.outgoing.push(id),
            ElementKind::PseudoState(data) => data.outgoing.push(id),
            ElementKind::Region(_) => {}
        }
        self.pending.push(pending);
        id
    }

    fn push_element(
        &mut self,
        name: String,
        parent: Option<ElementId>,
        kind: ElementKind,
    ) -> ElementId {
        let qualified_name = match parent {
            Some(p) => format!("{}.{}", self.elements[p.index()].qualified_name, name),
            None => name.clone(),
        };
        if let Some(observer) = &self.observer {
            observer.created(&qualified_name);
        }
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            name,
            qualified_name,
            parent,
            kind,
        });
        id
    }

    /// The region used when child vertices are added to a state directly,
    /// created on first use and named after its owning state.
    fn default_region(&mut self, state: ElementId) -> ElementId {
        if let Some(region) = self.state_data(state).default_region {
            return region;
        }
        let name = self.elements[state.index()].name.clone();
        let region = self.region(name, StateHandle(state));
        self.state_data_mut(state).default_region = Some(region.0);
        region.0
    }

    fn state_data(&self, id: ElementId) -> &StateData {
        match &self.elements[id.index()].kind {
            ElementKind::State(data) => data,
            _ => panic!("element is not a state"),
        }
    }

    fn state_data_mut(&mut self, id: ElementId) -> &mut StateData {
        match &mut self.elements[id.index()].kind {
            ElementKind::State(data) => data,
            _ => panic!("element is not a state"),
        }
    }

    fn region_data_mut(&mut self, id: ElementId) -> &mut RegionData {
        match &mut self.elements[id.index()].kind {
            ElementKind::Region(data) => data,
            _ => panic!("element is not a region"),
        }
    }
}

/// Depth-first search over the static junction graph; returns a junction on
/// a cycle, if any.
fn junction_cycle(elements: &[Element], pending: &[PendingTransition]) -> Option<ElementId> {
    fn is_junction(elements: &[Element], id: ElementId) -> bool {
        matches!(
            &elements[id.index()].kind,
            ElementKind::PseudoState(data) if data.kind == PseudoStateKind::Junction
        )
    }

    fn visit(
        elements: &[Element],
        pending: &[PendingTransition],
        id: ElementId,
        in_progress: &mut Vec<ElementId>,
        done: &mut Vec<ElementId>,
    ) -> Option<ElementId> {
        if done.contains(&id) {
            return None;
        }
        if in_progress.contains(&id) {
            return Some(id);
        }
        in_progress.push(id);
        for p in pending.iter().filter(|p| p.source == id) {
            if let Some(target) = p.target {
                if is_junction(elements, target) {
                    if let Some(cycle) = visit(elements, pending, target, in_progress, done) {
                        return Some(cycle);
                    }
                }
            }
        }
        in_progress.pop();
        done.push(id);
        None
    }

    let mut done = Vec::new();
    for (index, element) in elements.iter().enumerate() {
        let id = ElementId(index);
        if matches!(&element.kind, ElementKind::PseudoState(data) if data.kind == PseudoStateKind::Junction)
        {
            let mut in_progress = Vec::new();
            if let Some(cycle) = visit(elements, pending, id, &mut in_progress, &mut done) {
                return Some(cycle);
            }
        }
    }
    None
}
