// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Records delivered by the Lambda Telemetry API subscription.
//!
//! The `record` field of a telemetry item changes shape with its `type`. It is
//! decoded once here into [`Record`] so the rest of the pipeline matches on
//! variants instead of probing JSON values.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const PLATFORM_START: &str = "platform.start";
pub const PLATFORM_INIT_REPORT: &str = "platform.initReport";
pub const PLATFORM_RUNTIME_DONE: &str = "platform.runtimeDone";
pub const FUNCTION: &str = "function";
pub const REQ_RES: &str = "reqRes";
pub const SPANS: &str = "spans";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStart {
    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    #[serde(default)]
    pub duration_ms: f64,
    #[serde(default)]
    pub produced_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    #[serde(default)]
    pub initialization_type: String,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub metrics: ReportMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeDone {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub metrics: ReportMetrics,
}

/// Side metadata attached to `reqRes` records by the SDK.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordMeta {
    #[serde(default)]
    pub time: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    PlatformStart(PlatformStart),
    PlatformInitReport(InitReport),
    PlatformRuntimeDone(RuntimeDone),
    /// A line the function wrote to stdout/stderr.
    Function(String),
    /// Base64 envelope of a `RequestResponse` captured by the SDK.
    ReqRes(String),
    /// Base64 envelope of a `TracePayload` captured by the SDK.
    Spans(String),
    /// Any other type, or a payload whose shape does not match its type.
    Other { kind: String, record: Value },
}

impl Record {
    pub fn kind(&self) -> &str {
        match self {
            Record::PlatformStart(_) => PLATFORM_START,
            Record::PlatformInitReport(_) => PLATFORM_INIT_REPORT,
            Record::PlatformRuntimeDone(_) => PLATFORM_RUNTIME_DONE,
            Record::Function(_) => FUNCTION,
            Record::ReqRes(_) => REQ_RES,
            Record::Spans(_) => SPANS,
            Record::Other { kind, .. } => kind,
        }
    }

    fn from_raw(kind: String, record: Value) -> Record {
        let typed = match kind.as_str() {
            PLATFORM_START => PlatformStart::deserialize(&record)
                .ok()
                .map(Record::PlatformStart),
            PLATFORM_INIT_REPORT => InitReport::deserialize(&record)
                .ok()
                .map(Record::PlatformInitReport),
            PLATFORM_RUNTIME_DONE => RuntimeDone::deserialize(&record)
                .ok()
                .map(Record::PlatformRuntimeDone),
            FUNCTION => match &record {
                Value::String(line) => Some(Record::Function(line.clone())),
                Value::Null => None,
                // JSON formatted function logs arrive as objects
                structured => Some(Record::Function(structured.to_string())),
            },
            REQ_RES => record.as_str().map(|s| Record::ReqRes(s.to_string())),
            SPANS => record.as_str().map(|s| Record::Spans(s.to_string())),
            _ => None,
        };
        typed.unwrap_or(Record::Other { kind, record })
    }
}

#[derive(Deserialize)]
struct RawLogRecord {
    #[serde(default)]
    time: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    meta: Value,
    #[serde(default)]
    record: Value,
}

/// One item of a telemetry flush window.
///
/// Deserialization never fails: a null or missing `time` or `type` becomes an
/// empty string, and an item that is not a record at all is kept whole as
/// [`Record::Other`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct LogRecord {
    /// ISO-8601 time reported by the platform.
    pub time: String,
    pub meta: Option<RecordMeta>,
    pub record: Record,
}

impl From<Value> for LogRecord {
    fn from(value: Value) -> Self {
        match RawLogRecord::deserialize(&value) {
            Ok(raw) => LogRecord::from(raw),
            Err(e) => {
                debug!("Keeping malformed telemetry item as untyped: {e}");
                LogRecord::new(
                    String::new(),
                    Record::Other {
                        kind: String::new(),
                        record: value,
                    },
                )
            }
        }
    }
}

impl From<RawLogRecord> for LogRecord {
    fn from(raw: RawLogRecord) -> Self {
        let meta = match raw.meta {
            Value::Null => None,
            meta => RecordMeta::deserialize(&meta).ok(),
        };
        LogRecord {
            time: raw.time.unwrap_or_default(),
            meta,
            record: Record::from_raw(raw.kind.unwrap_or_default(), raw.record),
        }
    }
}

impl LogRecord {
    pub fn new(time: impl Into<String>, record: Record) -> Self {
        LogRecord {
            time: time.into(),
            meta: None,
            record,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: RecordMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn kind(&self) -> &str {
        self.record.kind()
    }
}
