//! Injectable observability sink.
//!
//! The engine reports categorized events through an [`Observer`] passed in
//! at instance construction. Observation is purely advisory: the default
//! [`NoopObserver`] discards everything and correctness never depends on a
//! sink being present. [`RecordingObserver`] keeps an ordered log of
//! [`TraceRecord`]s, which is also how the tests verify entry and exit
//! ordering.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Category of a trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TraceKind {
    /// A model element was created by the builder.
    Create,
    /// An element became part of an instance's active configuration.
    Entry,
    /// An element left an instance's active configuration.
    Exit,
    /// A transition executed.
    Transition,
    /// A trigger evaluation finished.
    Evaluate,
}

/// One observed event.
#[derive(Clone, Debug, Serialize)]
pub struct TraceRecord {
    pub kind: TraceKind,
    /// Name of the instance involved; `None` for model construction events.
    pub instance: Option<String>,
    /// Qualified element name, transition label, or evaluation outcome.
    pub subject: String,
    pub timestamp: DateTime<Utc>,
}

impl TraceRecord {
    fn new(kind: TraceKind, instance: Option<&str>, subject: &str) -> Self {
        TraceRecord {
            kind,
            instance: instance.map(str::to_string),
            subject: subject.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Sink for categorized runtime events.
///
/// All methods default to no-ops so implementations only override what
/// they care about. Implementations must be `Send + Sync`; instances may
/// be evaluated from any thread.
pub trait Observer: Send + Sync {
    /// A model element was created.
    fn created(&self, _element: &str) {}

    /// An instance entered an element.
    fn entered(&self, _instance: &str, _element: &str) {}

    /// An instance left an element.
    fn left(&self, _instance: &str, _element: &str) {}

    /// An instance executed a transition.
    fn transition(&self, _instance: &str, _transition: &str) {}

    /// An instance finished evaluating a trigger.
    fn evaluated(&self, _instance: &str, _consumed: bool) {}
}

/// Observer that does nothing; the default for new instances.
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Observer that appends every event to an ordered in-memory log.
///
/// # Example
///
/// ```rust
/// use statechart::{RecordingObserver, TraceKind};
///
/// let observer = RecordingObserver::new();
/// // ... attach via Instance::with_observer and evaluate triggers ...
/// let entries: Vec<_> = observer
///     .records()
///     .into_iter()
///     .filter(|r| r.kind == TraceKind::Entry)
///     .collect();
/// assert!(entries.is_empty());
/// ```
#[derive(Default)]
pub struct RecordingObserver {
    records: Mutex<Vec<TraceRecord>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in order.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().expect("observer lock poisoned").clone()
    }

    /// Drain the log, returning the records recorded so far.
    pub fn take(&self) -> Vec<TraceRecord> {
        std::mem::take(&mut *self.records.lock().expect("observer lock poisoned"))
    }

    /// Serialize the current log as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records())
    }

    fn push(&self, record: TraceRecord) {
        self.records
            .lock()
            .expect("observer lock poisoned")
            .push(record);
    }
}

impl Observer for RecordingObserver {
    fn created(&self, element: &str) {
        self.push(TraceRecord::new(TraceKind::Create, None, element));
    }

    fn entered(&self, instance: &str, element: &str) {
        self.push(TraceRecord::new(TraceKind::Entry, Some(instance), element));
    }

    fn left(&self, instance: &str, element: &str) {
        self.push(TraceRecord::new(TraceKind::Exit, Some(instance), element));
    }

    fn transition(&self, instance: &str, transition: &str) {
        self.push(TraceRecord::new(
            TraceKind::Transition,
            Some(instance),
            transition,
        ));
    }

    fn evaluated(&self, instance: &str, consumed: bool) {
        let subject = if consumed { "consumed" } else { "unconsumed" };
        self.push(TraceRecord::new(
            TraceKind::Evaluate,
            Some(instance),
            subject,
        ));
    }
}
