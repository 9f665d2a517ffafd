// crates/schema-forms-core/src/telemetry.rs
// ============================================================================
// Module: Form Events
// Description: Structured form lifecycle events and JSON-lines sinks.
// Purpose: Emit compile, multivalue, and submission events without a logging
//          framework dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Events are small serializable records written as one JSON object per
//! line. Hosts route them through a [`FormEventSink`]. Sink failures are
//! swallowed and never fail the operation that emitted the event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Form lifecycle event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event-specific fields.
    #[serde(flatten)]
    pub detail: EventDetail,
}

/// Event-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventDetail {
    /// A widget tree was compiled.
    Compiled {
        /// Number of value-holding widgets.
        field_count: usize,
        /// Number of tracked repeatable fields.
        repeatable_count: usize,
    },
    /// A repeatable field gained or lost an item.
    MultivalueChanged {
        /// Schema path of the field.
        field: String,
        /// `add` or `remove`.
        action: &'static str,
        /// Index added or requested for removal.
        delta: usize,
        /// Whether the live indices changed.
        applied: bool,
        /// Live indices after the change.
        indices: Vec<usize>,
    },
    /// A submission went through validation.
    SubmissionValidated {
        /// Total validator failures.
        error_count: usize,
        /// Failures attached to widgets.
        field_error_count: usize,
        /// Failures with no widget.
        generic_error_count: usize,
    },
}

impl FormEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(event: &'static str, detail: EventDetail) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            detail,
        }
    }

    /// Creates a `form_compiled` event.
    #[must_use]
    pub fn compiled(field_count: usize, repeatable_count: usize) -> Self {
        Self::new(
            "form_compiled",
            EventDetail::Compiled {
                field_count,
                repeatable_count,
            },
        )
    }

    /// Creates a `multivalue_changed` event.
    #[must_use]
    pub fn multivalue_changed(
        field: String,
        action: &'static str,
        delta: usize,
        applied: bool,
        indices: Vec<usize>,
    ) -> Self {
        Self::new(
            "multivalue_changed",
            EventDetail::MultivalueChanged {
                field,
                action,
                delta,
                applied,
                indices,
            },
        )
    }

    /// Creates a `submission_validated` event.
    #[must_use]
    pub fn submission_validated(
        error_count: usize,
        field_error_count: usize,
        generic_error_count: usize,
    ) -> Self {
        Self::new(
            "submission_validated",
            EventDetail::SubmissionValidated {
                error_count,
                field_error_count,
                generic_error_count,
            },
        )
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for form events.
pub trait FormEventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &FormEvent);
}

/// Sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl FormEventSink for StderrEventSink {
    fn record(&self, event: &FormEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileEventSink {
    /// Opens the event log in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FormEventSink for FileEventSink {
    fn record(&self, event: &FormEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Sink that drops every event.
pub struct NoopEventSink;

impl FormEventSink for NoopEventSink {
    fn record(&self, _event: &FormEvent) {}
}

/// Sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<FormEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<FormEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl FormEventSink for MemoryEventSink {
    fn record(&self, event: &FormEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
