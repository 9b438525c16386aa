//! Per-instance state: the active-state configuration store.
//!
//! An [`Instance`] is one running interpretation of a shared, immutable
//! [`Model`]. It records, per region, the currently active vertex and the
//! last active concrete state (the record history restoration and
//! completion checks consult), plus a pool of deferred triggers. Records
//! are written only by the entry/exit protocol; leaving an element does not
//! erase them, which is exactly what makes history work.

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::element::{ElementId, RegionHandle, StateHandle, VertexHandle};
use crate::model::Model;
use crate::observer::{NoopObserver, Observer};
use crate::runtime::entry::{enter, is_active};
use crate::runtime::error::EvaluateError;
use crate::runtime::evaluate::{evaluate, Completion, SharedTrigger};

/// A trigger parked in the deferred pool.
pub(crate) struct DeferredTrigger {
    pub(crate) trigger: SharedTrigger,
    pub(crate) deferred_at: DateTime<Utc>,
}

/// One running interpretation of a model.
///
/// The model is read-only and may back any number of instances across any
/// number of threads; each instance's configuration must only be mutated by
/// one trigger evaluation at a time — callers serialize triggers per
/// instance, different instances evaluate fully in parallel.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use statechart::{Instance, ModelBuilder, PseudoStateKind};
///
/// let mut builder = ModelBuilder::new("model");
/// let root = builder.root();
/// let initial = builder.pseudo_state("initial", root, PseudoStateKind::Initial)?;
/// let off = builder.state("off", root);
/// let on = builder.state("on", root);
/// builder.transition(initial).to(off);
/// builder
///     .transition(off)
///     .on::<String>()
///     .when(|t: &String| t == "power")
///     .to(on);
/// let model = Arc::new(builder.build()?);
///
/// let mut instance = Instance::new("player", Arc::clone(&model))?;
/// assert!(instance.is_active(off));
///
/// instance.evaluate(String::from("power"))?;
/// assert!(instance.is_active(on));
/// # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
/// ```
pub struct Instance {
    name: String,
    id: Uuid,
    model: Arc<Model>,
    observer: Arc<dyn Observer>,
    active_vertex: Vec<Option<ElementId>>,
    active_state: Vec<Option<ElementId>>,
    terminated: bool,
    pub(crate) deferred: Vec<DeferredTrigger>,
}

impl Instance {
    /// Create an instance and enter the model's root, populating the store
    /// with each region's starting configuration.
    pub fn new(name: impl Into<String>, model: Arc<Model>) -> Result<Self, EvaluateError> {
        Self::with_observer(name, model, Arc::new(NoopObserver))
    }

    /// As [`new`](Instance::new), reporting runtime events to `observer`.
    pub fn with_observer(
        name: impl Into<String>,
        model: Arc<Model>,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, EvaluateError> {
        let regions = model.region_count();
        let mut instance = Instance {
            name: name.into(),
            id: Uuid::new_v4(),
            model: Arc::clone(&model),
            observer: Arc::clone(&observer),
            active_vertex: vec![None; regions],
            active_state: vec![None; regions],
            terminated: false,
            deferred: Vec::new(),
        };
        let root = model.root();
        let trigger: SharedTrigger = Arc::new(Completion { state: root });
        enter(
            &model,
            observer.as_ref(),
            root.into(),
            &mut instance,
            false,
            &trigger,
        )?;
        Ok(instance)
    }

    /// Evaluate one trigger event against this instance.
    ///
    /// Returns whether the trigger was consumed (by a transition or by
    /// deferral). After a consumed trigger, pooled deferred events are
    /// re-offered oldest-first: events consumed by a transition leave the
    /// pool, events a still-active state defers stay pooled, and events
    /// nothing handles are discarded; passes repeat until one makes no
    /// progress. This redelivery policy is this crate's own; see
    /// DESIGN.md.
    pub fn evaluate<E: Any + Send + Sync>(&mut self, event: E) -> Result<bool, EvaluateError> {
        if self.terminated {
            return Ok(false);
        }
        let trigger: SharedTrigger = Arc::new(event);
        let model = Arc::clone(&self.model);
        let observer = Arc::clone(&self.observer);

        let consumed = evaluate(
            &model,
            observer.as_ref(),
            model.root().into(),
            self,
            false,
            &trigger,
        )?;
        observer.evaluated(&self.name, consumed);

        if consumed {
            self.redeliver_deferred(&model, observer.as_ref())?;
        }
        Ok(consumed)
    }

    /// Instance name, used in trace records.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique identity of this instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The shared model this instance interprets.
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// The last active concrete state of a region, if it was ever entered.
    pub fn state_of(&self, region: RegionHandle) -> Option<StateHandle> {
        self.get_state_id(region.into()).map(StateHandle)
    }

    /// The recorded active vertex (concrete or pseudo) of a region.
    pub fn vertex_of(&self, region: RegionHandle) -> Option<VertexHandle> {
        self.get_vertex_id(region.into())
            .and_then(|id| self.model.vertex_handle(id))
    }

    /// Whether a vertex is part of the current active configuration.
    pub fn is_active(&self, vertex: impl Into<VertexHandle>) -> bool {
        is_active(&self.model, self, vertex.into().id())
    }

    /// Whether a `Terminate` pseudo-state has been entered. A terminated
    /// instance ignores all further triggers.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Whether a state is final: no outgoing transitions and every child
    /// region's active state is itself final.
    pub fn is_final(&self, state: StateHandle) -> bool {
        self.is_final_id(state.into())
    }

    /// Number of triggers currently parked in the deferred pool.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// When the oldest pooled trigger was deferred.
    pub fn oldest_deferred_at(&self) -> Option<DateTime<Utc>> {
        self.deferred.first().map(|d| d.deferred_at)
    }

    pub(crate) fn get_state_id(&self, region: ElementId) -> Option<ElementId> {
        self.slot(region).and_then(|slot| self.active_state[slot])
    }

    pub(crate) fn get_vertex_id(&self, region: ElementId) -> Option<ElementId> {
        self.slot(region).and_then(|slot| self.active_vertex[slot])
    }

    /// Record a state as both the active vertex and the active concrete
    /// state of its parent region. The root has no parent; it is active
    /// vacuously.
    pub(crate) fn set_state(&mut self, state: ElementId) {
        if let Some(region) = self.model.parent(state) {
            if let Some(slot) = self.slot(region) {
                self.active_vertex[slot] = Some(state);
                self.active_state[slot] = Some(state);
            }
        }
    }

    /// Record a pseudo-state as its parent region's active vertex.
    pub(crate) fn set_vertex(&mut self, vertex: ElementId) {
        if let Some(region) = self.model.parent(vertex) {
            if let Some(slot) = self.slot(region) {
                self.active_vertex[slot] = Some(vertex);
            }
        }
    }

    pub(crate) fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Park a trigger in the deferred pool.
    pub(crate) fn defer(&mut self, trigger: &SharedTrigger) {
        self.deferred.push(DeferredTrigger {
            trigger: Arc::clone(trigger),
            deferred_at: Utc::now(),
        });
    }

    pub(crate) fn is_final_id(&self, state: ElementId) -> bool {
        let Some(data) = self.model.state_data(state) else {
            return false;
        };
        data.outgoing.is_empty()
            && data.regions.iter().all(|&region| {
                self.get_state_id(region)
                    .is_some_and(|active| self.is_final_id(active))
            })
    }

    fn slot(&self, region: ElementId) -> Option<usize> {
        self.model.region_data(region).map(|data| data.slot)
    }

    /// Re-offer pooled triggers oldest-first until a pass consumes none.
    fn redeliver_deferred(
        &mut self,
        model: &Model,
        observer: &dyn Observer,
    ) -> Result<(), EvaluateError> {
        loop {
            let pool = std::mem::take(&mut self.deferred);
            if pool.is_empty() {
                return Ok(());
            }
            let mut progressed = false;
            for entry in pool {
                if self.terminated {
                    return Ok(());
                }
                let before = self.deferred.len();
                let consumed = evaluate(
                    model,
                    observer,
                    model.root().into(),
                    self,
                    false,
                    &entry.trigger,
                )?;
                // a re-deferred trigger was already pushed back by the
                // defer step; an unconsumed one is discarded
                if consumed && self.deferred.len() == before {
                    progressed = true;
                }
            }
            if !progressed {
                return Ok(());
            }
        }
    }
}
