// crates/acm-check-core/src/events.rs
// ============================================================================
// Module: Validation Events
// Description: Structured log events for region resolution and checks.
// Purpose: Emit JSON-line logs without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Validation events are serialized as one JSON object per line. Sinks are
//! pluggable so the CLI can route them to stderr or a file while tests capture
//! them in memory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::checker::CheckName;
use crate::checker::CheckStatus;
use crate::region::RegionSource;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome label for a certificate fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Certificate returned.
    Ok,
    /// Describe call failed.
    Error,
    /// Describe call returned no certificate.
    Missing,
}

/// Validation event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ValidationEvent {
    /// Region was resolved.
    RegionResolved {
        /// Region code.
        region: String,
        /// Resolution source.
        source: RegionSource,
    },
    /// Ambient region lookup failed and was skipped.
    RegionAmbientError {
        /// Error message.
        message: String,
    },
    /// Certificate describe call completed.
    CertificateFetch {
        /// Check that requested the fetch, `None` for a shared fetch.
        check: Option<CheckName>,
        /// Certificate ARN.
        arn: String,
        /// Region the call was made in.
        region: Option<String>,
        /// Fetch outcome.
        outcome: FetchOutcome,
    },
    /// A check finished.
    CheckFinished {
        /// Check name.
        check: CheckName,
        /// Final status.
        status: CheckStatus,
        /// Assertion or error messages.
        failures: Vec<String>,
    },
}

/// Timestamped event as written by sinks.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event payload.
    #[serde(flatten)]
    pub event: ValidationEvent,
}

impl EventRecord {
    /// Stamps an event with the current time.
    #[must_use]
    pub fn now(event: ValidationEvent) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            timestamp_ms,
            event,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for validation events.
pub trait ValidationEventSink: Send + Sync {
    /// Records a timestamped event.
    fn record(&self, record: &EventRecord);

    /// Stamps and records an event.
    fn emit(&self, event: ValidationEvent) {
        self.record(&EventRecord::now(event));
    }
}

/// Discards all events.
pub struct NoopEventSink;

impl ValidationEventSink for NoopEventSink {
    fn record(&self, _record: &EventRecord) {}
}

/// Writes JSON lines to stderr.
pub struct StderrEventSink;

impl ValidationEventSink for StderrEventSink {
    fn record(&self, record: &EventRecord) {
        if let Ok(payload) = serde_json::to_string(record) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the log file in append mode.
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

impl ValidationEventSink for FileEventSink {
    fn record(&self, record: &EventRecord) {
        if let Ok(payload) = serde_json::to_string(record)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Keeps events in memory.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Captured events in arrival order.
    events: Mutex<Vec<ValidationEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ValidationEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl ValidationEventSink for MemoryEventSink {
    fn record(&self, record: &EventRecord) {
        if let Ok(mut events) = self.events.lock() {
            events.push(record.event.clone());
        }
    }
}
