//! The immutable model tree.
//!
//! A [`Model`] is produced once by a
//! [`ModelBuilder`](crate::builder::ModelBuilder) and never mutated again.
//! It may be wrapped in an `Arc` and interpreted concurrently by any number
//! of [`Instance`](crate::runtime::Instance)s.

use crate::model::element::{
    Element, ElementId, ElementKind, PseudoStateData, PseudoStateKind, RegionData, RegionHandle,
    StateData, StateHandle, VertexHandle,
};
use crate::model::transition::{Transition, TransitionId, Trigger};

/// An immutable hierarchy of regions, states and pseudo-states together
/// with their declared transitions.
///
/// Qualified names include every region on the path; a state's implicit
/// default region is named after the state, so it contributes a repeated
/// segment.
///
/// # Example
///
/// ```rust
/// use statechart::{ModelBuilder, PseudoStateKind};
///
/// let mut builder = ModelBuilder::new("model");
/// let root = builder.root();
/// let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial)?;
/// let idle = builder.state("idle", root);
/// builder.transition(initial).to(idle);
/// let model = builder.build()?;
///
/// assert_eq!(model.qualified_name_of(idle), "model.model.idle");
/// # Ok::<(), statechart::BuildError>(())
/// ```
pub struct Model {
    pub(crate) elements: Vec<Element>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) root: ElementId,
    pub(crate) region_count: usize,
}

impl Model {
    /// The root state of the hierarchy.
    pub fn root(&self) -> StateHandle {
        StateHandle(self.root)
    }

    /// Short name of any element.
    pub fn name_of(&self, element: impl Into<ElementId>) -> &str {
        &self.element(element.into()).name
    }

    /// Fully qualified, dot-separated name of any element.
    pub fn qualified_name_of(&self, element: impl Into<ElementId>) -> &str {
        &self.element(element.into()).qualified_name
    }

    /// The default region of a state, if one was created for it.
    pub fn default_region(&self, state: StateHandle) -> Option<RegionHandle> {
        self.state_data(state.0)
            .and_then(|data| data.default_region)
            .map(RegionHandle)
    }

    /// Child regions of a state, in declaration order.
    pub fn regions_of(&self, state: StateHandle) -> Vec<RegionHandle> {
        self.state_data(state.0)
            .map(|data| data.regions.iter().copied().map(RegionHandle).collect())
            .unwrap_or_default()
    }

    /// Number of regions in the model; instances size their per-region
    /// records from this.
    pub fn region_count(&self) -> usize {
        self.region_count
    }

    pub(crate) fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index()]
    }

    pub(crate) fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).parent
    }

    pub(crate) fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id.index()]
    }

    pub(crate) fn state_data(&self, id: ElementId) -> Option<&StateData> {
        match &self.element(id).kind {
            ElementKind::State(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn region_data(&self, id: ElementId) -> Option<&RegionData> {
        match &self.element(id).kind {
            ElementKind::Region(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn pseudo_data(&self, id: ElementId) -> Option<&PseudoStateData> {
        match &self.element(id).kind {
            ElementKind::PseudoState(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn pseudo_kind(&self, id: ElementId) -> Option<PseudoStateKind> {
        self.pseudo_data(id).map(|data| data.kind)
    }

    pub(crate) fn is_history(&self, id: ElementId) -> bool {
        self.pseudo_kind(id).is_some_and(PseudoStateKind::is_history)
    }

    pub(crate) fn vertex_handle(&self, id: ElementId) -> Option<VertexHandle> {
        match &self.element(id).kind {
            ElementKind::State(_) => Some(VertexHandle::State(StateHandle(id))),
            ElementKind::PseudoState(_) => {
                Some(VertexHandle::PseudoState(crate::model::PseudoStateHandle(id)))
            }
            ElementKind::Region(_) => None,
        }
    }

    pub(crate) fn outgoing(&self, vertex: ElementId) -> &[TransitionId] {
        match &self.element(vertex).kind {
            ElementKind::State(data) => &data.outgoing,
            ElementKind::PseudoState(data) => &data.outgoing,
            ElementKind::Region(_) => &[],
        }
    }

    /// First declared outgoing transition of `vertex` whose trigger-type
    /// test and guard both pass. Declaration order is the sole
    /// disambiguation policy; overlapping guards are the model author's
    /// responsibility.
    pub(crate) fn transition_for(&self, vertex: ElementId, trigger: &Trigger) -> Option<TransitionId> {
        self.outgoing(vertex)
            .iter()
            .copied()
            .find(|&id| self.transition(id).matches(trigger))
    }
}
