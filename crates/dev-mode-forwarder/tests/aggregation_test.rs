// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod common;

use base64::Engine;
use dev_mode_forwarder::aggregator::ActivityAggregator;
use dev_mode_forwarder::config::DeliveryMode;
use dev_mode_forwarder::envelope::encode_envelope;
use dev_mode_forwarder::identifiers::Identifiers;
use dev_mode_forwarder::instrumentation::{Instrumentation, Runtime};
use dev_mode_forwarder::schema::tags::ErrorType;
use dev_mode_forwarder::schema::{Origin, RequestResponse, Span, TracePayload};
use prost::Message;
use serde_json::json;

use common::{config, records, ACCOUNT_ID, REQUEST_ID};

fn aggregator(instrumentation: Instrumentation) -> ActivityAggregator {
    ActivityAggregator::new(
        config(DeliveryMode::Collector, "http://collector.local", ""),
        instrumentation,
    )
}

#[test]
fn test_timeout_window_without_sdk() {
    let batch = records(json!([
        {"time": "2024-01-01T00:00:00.000Z", "type": "platform.start",
         "record": {"requestId": REQUEST_ID, "version": "$LATEST"}},
        {"time": "2024-01-01T00:00:01.000Z", "type": "function",
         "record": "2024-01-01T00:00:01.000Z\t3fa85f64-5717-4562-b3fc-2c963f66afa6\tINFO\tworking\n"},
        {"time": "2024-01-01T00:00:05.000Z", "type": "platform.runtimeDone",
         "record": {"requestId": REQUEST_ID, "status": "timeout",
                    "metrics": {"durationMs": 5000.0, "producedBytes": 0}}},
        {"time": "2024-01-01T00:00:05.001Z", "type": "platform.report",
         "record": {"requestId": REQUEST_ID}}
    ]));

    let activity = aggregator(Instrumentation::external(Runtime::Node))
        .aggregate_window(&batch, ACCOUNT_ID);

    assert_eq!(activity.request_id, REQUEST_ID);
    assert_eq!(activity.request_response.len(), 2);
    assert_eq!(activity.logs.len(), 1);
    assert_eq!(activity.logs[0].log_events.len(), 1);
    assert!(activity.traces.is_empty());

    let response = &activity.request_response[1];
    let error = response
        .tags
        .as_ref()
        .and_then(|tags| tags.error.as_ref())
        .expect("timeout error tag");
    assert_eq!(error.name, "function_timeout");
    assert_eq!(
        error.message.as_deref(),
        Some("Task timed out after 5000.00 milliseconds")
    );
}

#[test]
fn test_synthesized_record_survives_the_wire() {
    let batch = records(json!([
        {"time": "2024-01-01T00:00:05.000Z", "type": "platform.runtimeDone",
         "record": {"requestId": REQUEST_ID, "status": "error", "errorType": "Runtime.ExitError"}}
    ]));
    let ids = Identifiers {
        request_id: REQUEST_ID.to_string(),
        trace_id: "trace".to_string(),
        account_id: ACCOUNT_ID.to_string(),
    };
    let activity = aggregator(Instrumentation::external(Runtime::Python)).aggregate(&batch, &ids);
    let synthesized = &activity.request_response[0];

    let decoded = RequestResponse::decode(synthesized.encode_to_vec().as_slice()).expect("decodes");
    assert!(decoded.has_origin(Origin::Response));
    assert_eq!(decoded.request_id.as_deref(), Some(REQUEST_ID));
    let error = decoded
        .tags
        .as_ref()
        .and_then(|tags| tags.error.clone())
        .expect("error tag");
    assert_eq!(error.r#type, ErrorType::Uncaught as i32);
    assert_eq!(error.name, "function_init_error");
    assert_eq!(
        error.message.as_deref(),
        Some("Received Runtime.ExitError. This is most likely an initialization error")
    );
    assert_eq!(&decoded, synthesized);
}

#[test]
fn test_sdk_window_is_passed_through() {
    let span_trace_id = b"0123456789abcdef".to_vec();
    let trace = TracePayload {
        spans: vec![Span {
            trace_id: span_trace_id.clone(),
            name: "aws.lambda".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };
    let response = RequestResponse {
        origin: Origin::Response as i32,
        body: Some("{\"ok\":true}".to_string()),
        timestamp: Some(1),
        ..Default::default()
    };
    let batch = records(json!([
        {"time": "2024-01-01T00:00:00.000Z", "type": "platform.start",
         "record": {"requestId": REQUEST_ID}},
        {"time": "2024-01-01T00:00:00.500Z", "type": "function",
         "record": "2024-01-01T00:00:00.500Z\t3fa85f64-5717-4562-b3fc-2c963f66afa6\tERROR\tcaptured by the sdk"},
        {"time": "2024-01-01T00:00:00.600Z", "type": "function",
         "record": "plain output"},
        {"time": "2024-01-01T00:00:00.700Z", "type": "spans",
         "record": encode_envelope(&trace)},
        {"time": "2024-01-01T00:00:00.800Z", "type": "reqRes",
         "meta": {"time": "2024-01-01T00:00:02.000Z", "type": "platform.runtimeDone"},
         "record": encode_envelope(&response)},
        {"time": "2024-01-01T00:00:02.000Z", "type": "platform.runtimeDone",
         "record": {"requestId": REQUEST_ID, "status": "success"}}
    ]));

    let activity = aggregator(Instrumentation::new(true, Runtime::Node))
        .aggregate_window(&batch, ACCOUNT_ID);

    assert_eq!(activity.request_response.len(), 1);
    let forwarded = &activity.request_response[0];
    assert_eq!(forwarded.body.as_deref(), Some("{\"ok\":true}"));
    assert_eq!(forwarded.timestamp, Some(1_704_067_202_000_000_000));

    assert_eq!(activity.traces, vec![trace]);

    let events = &activity.logs[0].log_events;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].body, "plain output");
    assert_eq!(
        events[0].trace_id.as_deref(),
        Some(
            base64::engine::general_purpose::STANDARD
                .encode(&span_trace_id)
                .as_str()
        )
    );
}
