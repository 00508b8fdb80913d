// crates/form-validator/src/audit.rs
// ============================================================================
// Module: Validation Audit Logging
// Description: Structured audit events for validator activity.
// Purpose: Emit JSON-line records of registry and unit transitions.
// Dependencies: form-logic, serde, serde_json
// ============================================================================

//! ## Overview
//! The validator records every lifecycle transition as a
//! [`ValidationAuditEvent`] through a [`ValidationAuditSink`]. Sinks are
//! best-effort: serialization or I/O failures are dropped so that logging
//! never changes validation behavior.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use form_logic::ValidationResult;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Kind of validator transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    /// A unit was registered
    ValidationAdded,
    /// A unit was removed
    ValidationRemoved,
    /// Removal was refused because the form rule references the unit
    RemovalRejected,
    /// A component event scheduled a debounced revalidation
    RevalidationScheduled,
    /// A unit is about to invoke its rule
    UnitWillValidate,
    /// A unit settled on a result
    UnitValidated,
    /// An asynchronous verdict arrived for a superseded generation
    CompletionSuperseded,
    /// The form rule referenced an identifier with no unit
    UnknownIdentifier,
    /// The form-level result was recomputed
    FormValidated,
}

/// Validator audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationAuditEvent {
    /// Event kind.
    pub event: AuditEventKind,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Unit identifier when the event concerns one unit.
    pub identifier: Option<String>,
    /// Result carried by the event.
    pub result: Option<ValidationResult>,
    /// Unit generation carried by the event.
    pub generation: Option<u64>,
    /// Error description carried by the event.
    pub error: Option<String>,
}

impl ValidationAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(event: AuditEventKind) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            identifier: None,
            result: None,
            generation: None,
            error: None,
        }
    }

    /// Attaches the unit identifier
    #[must_use]
    pub fn with_identifier(mut self, identifier: &impl fmt::Display) -> Self {
        self.identifier = Some(identifier.to_string());
        self
    }

    /// Attaches a result
    #[must_use]
    pub const fn with_result(mut self, result: ValidationResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Attaches a unit generation
    #[must_use]
    pub const fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Attaches an error description
    #[must_use]
    pub fn with_error(mut self, error: &impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for validator events.
pub trait ValidationAuditSink: Send + Sync {
    /// Records a validator event.
    fn record(&self, event: &ValidationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ValidationAuditSink for StderrAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
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

impl ValidationAuditSink for FileAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<ValidationAuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty in-memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ValidationAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns the kinds of the recorded events.
    #[must_use]
    pub fn kinds(&self) -> Vec<AuditEventKind> {
        self.events().iter().map(|event| event.event).collect()
    }
}

impl ValidationAuditSink for MemoryAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Audit sink that drops all events.
pub struct NoopAuditSink;

impl ValidationAuditSink for NoopAuditSink {
    fn record(&self, _event: &ValidationAuditEvent) {}
}
