//! Elements of the state machine hierarchy.
//!
//! Regions, states and pseudo-states are all named, parented elements held
//! in a single arena owned by [`Model`](crate::model::Model). Elements refer
//! to one another by [`ElementId`], never by pointer, so the model can be
//! shared freely across instances and threads once built.

use std::any::TypeId;

use crate::model::transition::{ActionFn, TransitionId};

/// Stable identifier of an element within its model's arena.
///
/// Ids are assigned in creation order and never change once the model is
/// built. They are only meaningful for the model that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Handle to a state created by a [`ModelBuilder`](crate::builder::ModelBuilder).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateHandle(pub(crate) ElementId);

/// Handle to a region created by a [`ModelBuilder`](crate::builder::ModelBuilder).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionHandle(pub(crate) ElementId);

/// Handle to a pseudo-state created by a [`ModelBuilder`](crate::builder::ModelBuilder).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PseudoStateHandle(pub(crate) ElementId);

/// Either kind of vertex: the endpoints transitions connect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexHandle {
    State(StateHandle),
    PseudoState(PseudoStateHandle),
}

impl VertexHandle {
    pub(crate) fn id(self) -> ElementId {
        match self {
            VertexHandle::State(s) => s.0,
            VertexHandle::PseudoState(p) => p.0,
        }
    }
}

impl From<StateHandle> for VertexHandle {
    fn from(handle: StateHandle) -> Self {
        VertexHandle::State(handle)
    }
}

impl From<PseudoStateHandle> for VertexHandle {
    fn from(handle: PseudoStateHandle) -> Self {
        VertexHandle::PseudoState(handle)
    }
}

impl From<StateHandle> for ElementId {
    fn from(handle: StateHandle) -> Self {
        handle.0
    }
}

impl From<RegionHandle> for ElementId {
    fn from(handle: RegionHandle) -> Self {
        handle.0
    }
}

impl From<PseudoStateHandle> for ElementId {
    fn from(handle: PseudoStateHandle) -> Self {
        handle.0
    }
}

impl From<VertexHandle> for ElementId {
    fn from(handle: VertexHandle) -> Self {
        handle.id()
    }
}

/// The structural routing role of a pseudo-state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PseudoStateKind {
    /// Default entry point of a region.
    Initial,
    /// Chains transitions into a single atomic hop; the chain is resolved
    /// before any of its transitions execute.
    Junction,
    /// Dynamic branch: its outgoing transitions are evaluated on entry.
    Choice,
    /// Re-enters the region's last active state; descendant regions use
    /// their default entry.
    ShallowHistory,
    /// Re-enters the region's last active state and cascades history to
    /// every descendant region.
    DeepHistory,
    /// Entering it stops the instance reacting to further triggers.
    Terminate,
}

impl PseudoStateKind {
    /// True for the history kinds.
    pub fn is_history(self) -> bool {
        matches!(
            self,
            PseudoStateKind::ShallowHistory | PseudoStateKind::DeepHistory
        )
    }

    /// True for kinds that may act as a region's starting vertex.
    pub fn is_starting(self) -> bool {
        matches!(
            self,
            PseudoStateKind::Initial
                | PseudoStateKind::ShallowHistory
                | PseudoStateKind::DeepHistory
        )
    }
}

/// One arena slot: name, parentage and kind-specific payload.
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) kind: ElementKind,
}

pub(crate) enum ElementKind {
    Region(RegionData),
    State(StateData),
    PseudoState(PseudoStateData),
}

pub(crate) struct RegionData {
    /// Child vertices in declaration order.
    pub(crate) vertices: Vec<ElementId>,
    /// The region's configured starting pseudo-state.
    pub(crate) starting: Option<ElementId>,
    /// Dense index into each instance's per-region records.
    pub(crate) slot: usize,
}

pub(crate) struct StateData {
    /// Child regions in declaration order.
    pub(crate) regions: Vec<ElementId>,
    /// Lazily created region used when child vertices are added to the
    /// state directly.
    pub(crate) default_region: Option<ElementId>,
    pub(crate) entry: Vec<ActionFn>,
    pub(crate) exit: Vec<ActionFn>,
    /// Trigger types this state absorbs into the deferred pool.
    pub(crate) deferrable: Vec<TypeId>,
    pub(crate) outgoing: Vec<TransitionId>,
}

impl StateData {
    pub(crate) fn new() -> Self {
        StateData {
            regions: Vec::new(),
            default_region: None,
            entry: Vec::new(),
            exit: Vec::new(),
            deferrable: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

pub(crate) struct PseudoStateData {
    pub(crate) kind: PseudoStateKind,
    pub(crate) outgoing: Vec<TransitionId>,
}
