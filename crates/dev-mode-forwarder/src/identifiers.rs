// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Lookups over one flush window of telemetry records.

use base64::Engine;
use tracing::debug;
use uuid::Uuid;

use crate::envelope::decode_envelope;
use crate::instrumentation::Instrumentation;
use crate::schema::{Origin, RequestResponse, TracePayload};
use crate::telemetry::{InitReport, LogRecord, PlatformStart, Record, RuntimeDone};

const INIT_ERROR_MARKER: &str = "\tundefined\tERROR";
const UNCAUGHT_EXCEPTION_MARKER: &str = "\tundefined\tUncaught Exception";

/// Identifiers resolved once per flush window and copied onto every record
/// derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifiers {
    pub request_id: String,
    pub trace_id: String,
    pub account_id: String,
}

impl Identifiers {
    pub fn resolve(
        records: &[LogRecord],
        account_id: impl Into<String>,
        instrumentation: &Instrumentation,
    ) -> Self {
        Identifiers {
            request_id: find_request_id(records),
            trace_id: find_trace_id(records, instrumentation),
            account_id: account_id.into(),
        }
    }
}

/// Request id of the first `platform.start` record, empty when there is none.
pub fn find_request_id(records: &[LogRecord]) -> String {
    find_platform_start(records)
        .map(|(_, start)| start.request_id.clone())
        .unwrap_or_default()
}

/// Trace id shared by the SDK spans of this window.
///
/// Without an SDK nobody else will produce one, so a fresh id is generated on
/// every call. Otherwise the first decodable `spans` envelope with a span (or,
/// failing that, an event) supplies it, base64 encoded. Empty when no envelope
/// carries one.
pub fn find_trace_id(records: &[LogRecord], instrumentation: &Instrumentation) -> String {
    if !instrumentation.is_active() {
        return Uuid::new_v4().to_string();
    }

    for record in records {
        let Record::Spans(envelope) = &record.record else {
            continue;
        };
        let payload = match decode_envelope::<TracePayload>(envelope) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Skipping undecodable spans record: {e}");
                continue;
            }
        };
        let trace_id = payload
            .spans
            .first()
            .map(|span| &span.trace_id)
            .or_else(|| payload.events.first().map(|event| &event.trace_id));
        if let Some(trace_id) = trace_id {
            return base64::engine::general_purpose::STANDARD.encode(trace_id);
        }
    }
    String::new()
}

pub fn find_platform_start(records: &[LogRecord]) -> Option<(&LogRecord, &PlatformStart)> {
    records.iter().find_map(|log| match &log.record {
        Record::PlatformStart(start) => Some((log, start)),
        _ => None,
    })
}

pub fn find_init_report(records: &[LogRecord]) -> Option<(&LogRecord, &InitReport)> {
    records.iter().find_map(|log| match &log.record {
        Record::PlatformInitReport(report) => Some((log, report)),
        _ => None,
    })
}

pub fn find_runtime_done(records: &[LogRecord]) -> Option<(&LogRecord, &RuntimeDone)> {
    records.iter().find_map(|log| match &log.record {
        Record::PlatformRuntimeDone(done) => Some((log, done)),
        _ => None,
    })
}

/// First function line reporting an uncaught exception during init.
pub fn find_init_error_log(records: &[LogRecord]) -> Option<&LogRecord> {
    records.iter().find(|log| match &log.record {
        Record::Function(line) => {
            line.contains(INIT_ERROR_MARKER) && line.contains(UNCAUGHT_EXCEPTION_MARKER)
        }
        _ => false,
    })
}

/// First `reqRes` record the SDK captured for the inbound request.
pub fn find_request_data(records: &[LogRecord]) -> Option<&LogRecord> {
    find_request_response(records, Origin::Request)
}

/// First `reqRes` record the SDK captured for the outbound response.
pub fn find_response_data(records: &[LogRecord]) -> Option<&LogRecord> {
    find_request_response(records, Origin::Response)
}

fn find_request_response(records: &[LogRecord], origin: Origin) -> Option<&LogRecord> {
    records.iter().find(|log| match &log.record {
        Record::ReqRes(envelope) => decode_envelope::<RequestResponse>(envelope)
            .map(|payload| payload.has_origin(origin))
            .unwrap_or(false),
        _ => false,
    })
}
