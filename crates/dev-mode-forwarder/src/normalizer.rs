// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use base64::Engine;
use chrono::Utc;

use crate::classifier::{is_valid_uuid, Classifier};
use crate::config::Config;
use crate::identifiers::Identifiers;
use crate::schema::tags::{AwsTags, SlsTags, Tags};
use crate::schema::{LogEvent, LogPayload};
use crate::telemetry::{LogRecord, Record};
use crate::timestamp::{parse_rfc3339, unix_millis};

/// Lines carrying this marker are the extension's own telemetry output.
pub const TELEMETRY_MARKER: &str = "SERVERLESS_TELEMETRY.";

const LOG_PLATFORM: &str = "aws";
const SEVERITY_TEXT: &str = "Info";
const SEVERITY_NUMBER: u64 = 1;

/// Turns function output the SDK did not capture into structured log events.
pub struct LogNormalizer<'a> {
    config: &'a Config,
    classifier: &'a Classifier,
}

impl<'a> LogNormalizer<'a> {
    pub fn new(config: &'a Config, classifier: &'a Classifier) -> Self {
        LogNormalizer { config, classifier }
    }

    pub fn normalize(&self, records: &[LogRecord], ids: &Identifiers) -> LogPayload {
        let trace_id = encode_trace_id(&ids.trace_id);
        let clock_base = now_nanos();

        let log_events = records
            .iter()
            .enumerate()
            .filter_map(|(index, log)| {
                let Record::Function(line) = &log.record else {
                    return None;
                };
                if line.contains(TELEMETRY_MARKER) || self.classifier.is_captured(line) {
                    return None;
                }
                let sequence_id = clock_base.saturating_add(index as u64).to_string();
                Some(self.log_event(log, line, sequence_id, &trace_id, ids))
            })
            .collect();

        LogPayload {
            sls_tags: Some(SlsTags {
                org_id: self.config.org_id.clone(),
                platform: Some(LOG_PLATFORM.to_string()),
                region: Some(self.config.region.clone()),
                service: self.config.function_name.clone(),
                ..Default::default()
            }),
            log_events,
        }
    }

    fn log_event(
        &self,
        log: &LogRecord,
        line: &str,
        sequence_id: String,
        trace_id: &str,
        ids: &Identifiers,
    ) -> LogEvent {
        let time = parse_rfc3339(&log.time).unwrap_or_else(Utc::now);
        LogEvent {
            body: line.to_string(),
            timestamp: unix_millis(time),
            severity_text: SEVERITY_TEXT.to_string(),
            severity_number: SEVERITY_NUMBER,
            trace_id: Some(trace_id.to_string()),
            tags: Some(Tags {
                aws: Some(AwsTags {
                    log_group: Some(self.config.log_group.clone()),
                    log_stream: Some(self.config.log_stream.clone()),
                    sequence_id: Some(sequence_id),
                    account_id: Some(ids.account_id.clone()),
                    request_id: Some(ids.request_id.clone()),
                    ..Default::default()
                }),
                org_id: Some(self.config.org_id.clone()),
                ..Default::default()
            }),
        }
    }
}

/// Generated trace ids are raw UUIDs, SDK trace ids arrive base64 encoded
/// already.
fn encode_trace_id(trace_id: &str) -> String {
    if is_valid_uuid(trace_id) {
        base64::engine::general_purpose::STANDARD.encode(trace_id)
    } else {
        trace_id.to_string()
    }
}

fn now_nanos() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .unwrap_or_default()
}
