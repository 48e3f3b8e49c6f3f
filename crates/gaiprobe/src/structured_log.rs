//! Structured JSONL trace of a probe run.
//!
//! Provides:
//! - [`LogEntry`]: one JSONL record with required + optional fields.
//! - [`LogEmitter`]: writes entries to a file (or any writer) with sequential trace ids.
//! - [`validate_log_line`]: checks a single line against the record contract.
//!
//! Required fields: `timestamp`, `trace_id`, `level`, `event`. Everything else is
//! omitted when unset.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use gaiprobe_core::{Hints, TokenOutcome};

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Event names emitted by the run pipeline.
pub mod events {
    pub const TOKEN_MATCHED: &str = "token_matched";
    pub const TOKEN_UNKNOWN: &str = "token_unknown";
    pub const RESOLVE_START: &str = "resolve_start";
    pub const RESOLVE_OK: &str = "resolve_ok";
    pub const RESOLVE_FAILED: &str = "resolve_failed";
    pub const RUN_COMPLETE: &str = "run_complete";
}

/// Serializable copy of the hint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintsSnapshot {
    pub flags: i32,
    pub socktype: i32,
    pub family: i32,
    pub protocol: i32,
}

impl From<&Hints> for HintsSnapshot {
    fn from(h: &Hints) -> Self {
        Self {
            flags: h.flags,
            socktype: h.socktype,
            family: h.family,
            protocol: h.protocol,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Vocabulary that matched (`flag`, `socktype`, `family`, `protocol`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<HintsSnapshot>,
    /// Raw `EAI_*` status on resolution failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gai_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errno: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            token: None,
            category: None,
            value: None,
            host: None,
            service: None,
            hints: None,
            gai_code: None,
            errno: None,
            record_count: None,
            exit_code: None,
            details: None,
        }
    }

    /// Entry describing how one command-line token was classified.
    #[must_use]
    pub fn for_token(outcome: &TokenOutcome) -> Self {
        match outcome {
            TokenOutcome::Matched(m) => LogEntry::new("", LogLevel::Debug, events::TOKEN_MATCHED)
                .with_token(m.name)
                .with_category(m.category.as_str(), m.value),
            TokenOutcome::Unknown(token) => {
                LogEntry::new("", LogLevel::Warn, events::TOKEN_UNKNOWN).with_token(token.as_str())
            }
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the matched vocabulary and its numeric value.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>, value: i32) -> Self {
        self.category = Some(category.into());
        self.value = Some(value);
        self
    }

    /// Set the resolver target.
    #[must_use]
    pub fn with_target(mut self, host: impl Into<String>, service: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self.service = Some(service.into());
        self
    }

    #[must_use]
    pub fn with_hints(mut self, hints: &Hints) -> Self {
        self.hints = Some(HintsSnapshot::from(hints));
        self
    }

    /// Set the resolver status and, for `EAI_SYSTEM`, the captured errno.
    #[must_use]
    pub fn with_gai_code(mut self, code: i32, errno: Option<i32>) -> Self {
        self.gai_code = Some(code);
        self.errno = errno;
        self
    }

    #[must_use]
    pub fn with_record_count(mut self, count: usize) -> Self {
        self.record_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = Some(exit_code);
        self
    }

    /// Set free-form details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Log emitter
// ---------------------------------------------------------------------------

/// Writes structured JSONL log entries.
pub struct LogEmitter {
    writer: Box<dyn Write>,
    seq: u64,
    run_id: String,
}

impl LogEmitter {
    /// Create an emitter that writes to a file (truncating it).
    pub fn to_file(path: &Path, run_id: &str) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::to_writer(
            Box::new(std::io::BufWriter::new(file)),
            run_id,
        ))
    }

    /// Create an emitter over an arbitrary writer.
    #[must_use]
    pub fn to_writer(writer: Box<dyn Write>, run_id: &str) -> Self {
        Self {
            writer,
            seq: 0,
            run_id: run_id.to_string(),
        }
    }

    /// Generate the next trace ID.
    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("gaiprobe::{}::{:03}", self.run_id, self.seq)
    }

    /// Emit a fully-populated entry; an empty trace id is filled in.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<()> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.next_trace_id();
        }
        let line = serde_json::to_string(&entry).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{line}")
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// Run identifier derived from the process id and start time.
#[must_use]
pub fn default_run_id() -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{}-{millis}", std::process::id())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validation error for a log line.
#[derive(Debug)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

/// Validate a single JSONL line.
///
/// Returns the parsed entry if valid, or every violation found.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let mut errors = Vec::new();
    let err = |field: &str, message: String| LogValidationError {
        line_number,
        field: field.to_string(),
        message,
    };

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Err(vec![err("<json>", format!("invalid JSON: {e}"))]),
    };
    let Some(obj) = value.as_object() else {
        return Err(vec![err("<root>", "expected JSON object".to_string())]);
    };

    for field in ["timestamp", "trace_id", "level", "event"] {
        if !obj.contains_key(field) {
            errors.push(err(field, "required field missing".to_string()));
        }
    }

    if let Some(level) = obj.get("level").and_then(|v| v.as_str())
        && !["debug", "info", "warn", "error"].contains(&level)
    {
        errors.push(err("level", format!("invalid level: '{level}'")));
    }

    if let Some(category) = obj.get("category").and_then(|v| v.as_str())
        && !["flag", "socktype", "family", "protocol"].contains(&category)
    {
        errors.push(err("category", format!("invalid category: '{category}'")));
    }

    if let Some(trace_id) = obj.get("trace_id").and_then(|v| v.as_str())
        && trace_id.is_empty()
    {
        errors.push(err("trace_id", "must not be empty".to_string()));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(value).map_err(|e| vec![err("<schema>", e.to_string())])
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format_utc(duration.as_secs(), duration.subsec_millis())
}

fn format_utc(secs: u64, millis: u32) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60,
    )
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
