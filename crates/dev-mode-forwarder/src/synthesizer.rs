// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Request/response records for one flush window.
//!
//! When the SDK captured the invocation its `reqRes` envelopes are passed on
//! as they are. Otherwise a REQUEST record is synthesized from
//! `platform.start` and a RESPONSE record from `platform.runtimeDone`. Both
//! paths yield base64 envelopes so the aggregator decodes them the same way.

use chrono::Utc;

use crate::config::Config;
use crate::envelope::encode_envelope;
use crate::identifiers::{find_platform_start, find_runtime_done, Identifiers};
use crate::instrumentation::Instrumentation;
use crate::schema::tags::{AwsTags, ErrorTags, ErrorType, SdkTags, SlsTags, Tags};
use crate::schema::{Origin, RequestResponse};
use crate::telemetry::{LogRecord, Record, RecordMeta, RuntimeDone};
use crate::timestamp::{parse_platform_time, unix_nanos};

pub const EXTERNAL_SDK_NAME: &str = "@serverless/external-extension";
pub const EXTERNAL_SDK_VERSION: &str = "N/A";
pub const REQUEST_TYPE: &str = "aws-lambda-request";
pub const RESPONSE_TYPE: &str = "aws-lambda-response";

const PLATFORM: &str = "lambda";
const STATUS_TIMEOUT: &str = "timeout";
const STATUS_ERROR: &str = "error";

/// Envelopes in arrival order. `metadata[i]` belongs to `envelopes[i]` for
/// SDK records; synthesized records have no metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestResponseEnvelopes {
    pub envelopes: Vec<String>,
    pub metadata: Vec<RecordMeta>,
}

pub struct RequestResponseSynthesizer<'a> {
    config: &'a Config,
    instrumentation: Instrumentation,
}

impl<'a> RequestResponseSynthesizer<'a> {
    pub fn new(config: &'a Config, instrumentation: Instrumentation) -> Self {
        RequestResponseSynthesizer {
            config,
            instrumentation,
        }
    }

    pub fn collect(&self, records: &[LogRecord], ids: &Identifiers) -> RequestResponseEnvelopes {
        let mut collected = RequestResponseEnvelopes::default();
        for log in records {
            if let Record::ReqRes(envelope) = &log.record {
                collected.envelopes.push(envelope.clone());
                collected.metadata.push(log.meta.clone().unwrap_or_default());
            }
        }
        if !collected.envelopes.is_empty() {
            return collected;
        }

        if !self.instrumentation.is_active() {
            if let Some((start, _)) = find_platform_start(records) {
                let request = self.request(ids, &start.time);
                collected.envelopes.push(encode_envelope(&request));
            }
        }
        if let Some((log, done)) = find_runtime_done(records) {
            let response = self.response(ids, &log.time, done);
            collected.envelopes.push(encode_envelope(&response));
        }
        collected
    }

    pub fn request(&self, ids: &Identifiers, time: &str) -> RequestResponse {
        self.synthesize(ids, time, Origin::Request, REQUEST_TYPE, None)
    }

    pub fn response(&self, ids: &Identifiers, time: &str, done: &RuntimeDone) -> RequestResponse {
        self.synthesize(ids, time, Origin::Response, RESPONSE_TYPE, error_tag(done))
    }

    fn synthesize(
        &self,
        ids: &Identifiers,
        time: &str,
        origin: Origin,
        kind: &str,
        error: Option<ErrorTags>,
    ) -> RequestResponse {
        let timestamp = parse_platform_time(time).unwrap_or_else(Utc::now);
        RequestResponse {
            sls_tags: Some(SlsTags {
                org_id: self.config.org_id.clone(),
                platform: Some(PLATFORM.to_string()),
                region: Some(self.config.region.clone()),
                service: self.config.function_name.clone(),
                sdk: Some(external_sdk()),
                ..Default::default()
            }),
            tags: Some(Tags {
                aws: Some(resource_tags(self.config, ids)),
                error,
                org_id: Some(self.config.org_id.clone()),
                sdk: Some(external_sdk()),
            }),
            is_historical: Some(false),
            body: Some(String::new()),
            request_id: Some(ids.request_id.clone()),
            span_id: ids.request_id.as_bytes().to_vec(),
            origin: origin as i32,
            timestamp: Some(unix_nanos(timestamp)),
            r#type: Some(kind.to_string()),
            trace_id: ids.trace_id.as_bytes().to_vec(),
        }
    }
}

/// Resource tags every request/response record of a window carries.
pub fn resource_tags(config: &Config, ids: &Identifiers) -> AwsTags {
    AwsTags {
        account_id: Some(ids.account_id.clone()),
        request_id: Some(ids.request_id.clone()),
        region: Some(config.region.clone()),
        resource_name: Some(config.function_name.clone()),
        ..Default::default()
    }
}

fn external_sdk() -> SdkTags {
    SdkTags {
        name: EXTERNAL_SDK_NAME.to_string(),
        version: EXTERNAL_SDK_VERSION.to_string(),
        runtime: None,
    }
}

fn error_tag(done: &RuntimeDone) -> Option<ErrorTags> {
    let (name, message) = match done.status.as_str() {
        STATUS_TIMEOUT => (
            "function_timeout",
            format!(
                "Task timed out after {:.2} milliseconds",
                done.metrics.duration_ms
            ),
        ),
        STATUS_ERROR => (
            "function_init_error",
            format!(
                "Received {}. This is most likely an initialization error",
                done.error_type.as_deref().unwrap_or_default()
            ),
        ),
        _ => return None,
    };
    Some(ErrorTags {
        name: name.to_string(),
        message: Some(message),
        stacktrace: None,
        r#type: ErrorType::Uncaught as i32,
    })
}
