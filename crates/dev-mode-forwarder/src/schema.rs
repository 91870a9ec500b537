// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Protobuf messages shared with the SDKs and the dev mode collector.

pub mod tags {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SdkTags {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(string, tag = "2")]
        pub version: String,
        #[prost(string, optional, tag = "3")]
        pub runtime: Option<String>,
    }

    /// Tags identifying the organization and service the payload belongs to.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SlsTags {
        #[prost(string, tag = "1")]
        pub org_id: String,
        #[prost(string, optional, tag = "2")]
        pub platform: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub region: Option<String>,
        #[prost(string, tag = "4")]
        pub service: String,
        #[prost(string, optional, tag = "5")]
        pub environment: Option<String>,
        #[prost(string, optional, tag = "6")]
        pub namespace: Option<String>,
        #[prost(message, optional, tag = "7")]
        pub sdk: Option<SdkTags>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct AwsTags {
        #[prost(string, optional, tag = "1")]
        pub log_group: Option<String>,
        #[prost(string, optional, tag = "2")]
        pub log_stream: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub sequence_id: Option<String>,
        #[prost(string, optional, tag = "4")]
        pub account_id: Option<String>,
        #[prost(string, optional, tag = "5")]
        pub request_id: Option<String>,
        #[prost(string, optional, tag = "6")]
        pub region: Option<String>,
        #[prost(string, optional, tag = "7")]
        pub resource_name: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum ErrorType {
        Unspecified = 0,
        Uncaught = 1,
        Caught = 2,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ErrorTags {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(string, optional, tag = "2")]
        pub message: Option<String>,
        #[prost(string, optional, tag = "3")]
        pub stacktrace: Option<String>,
        #[prost(enumeration = "ErrorType", tag = "4")]
        pub r#type: i32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Tags {
        #[prost(message, optional, tag = "1")]
        pub aws: Option<AwsTags>,
        #[prost(message, optional, tag = "2")]
        pub error: Option<ErrorTags>,
        #[prost(string, optional, tag = "3")]
        pub org_id: Option<String>,
        #[prost(message, optional, tag = "4")]
        pub sdk: Option<SdkTags>,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Origin {
    Unspecified = 0,
    Request = 1,
    Response = 2,
}

/// Request or response of one invocation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequestResponse {
    #[prost(message, optional, tag = "1")]
    pub sls_tags: Option<tags::SlsTags>,
    #[prost(message, optional, tag = "2")]
    pub tags: Option<tags::Tags>,
    #[prost(bool, optional, tag = "3")]
    pub is_historical: Option<bool>,
    #[prost(string, optional, tag = "4")]
    pub body: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub request_id: Option<String>,
    #[prost(bytes = "vec", tag = "6")]
    pub span_id: Vec<u8>,
    #[prost(enumeration = "Origin", tag = "7")]
    pub origin: i32,
    /// Unix epoch, nanoseconds.
    #[prost(uint64, optional, tag = "8")]
    pub timestamp: Option<u64>,
    #[prost(string, optional, tag = "9")]
    pub r#type: Option<String>,
    #[prost(bytes = "vec", tag = "10")]
    pub trace_id: Vec<u8>,
}

impl RequestResponse {
    pub fn has_origin(&self, origin: Origin) -> bool {
        self.origin == origin as i32
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogEvent {
    #[prost(string, tag = "1")]
    pub body: String,
    /// Unix epoch, milliseconds.
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
    #[prost(string, tag = "3")]
    pub severity_text: String,
    #[prost(uint64, tag = "4")]
    pub severity_number: u64,
    #[prost(string, optional, tag = "5")]
    pub trace_id: Option<String>,
    #[prost(message, optional, tag = "6")]
    pub tags: Option<tags::Tags>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogPayload {
    #[prost(message, optional, tag = "1")]
    pub sls_tags: Option<tags::SlsTags>,
    #[prost(message, repeated, tag = "2")]
    pub log_events: Vec<LogEvent>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Span {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub trace_id: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub parent_span_id: Option<Vec<u8>>,
    #[prost(string, tag = "4")]
    pub name: String,
    #[prost(uint64, tag = "5")]
    pub start_time_unix_nano: u64,
    #[prost(uint64, tag = "6")]
    pub end_time_unix_nano: u64,
    #[prost(message, optional, tag = "7")]
    pub tags: Option<tags::Tags>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Event {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub trace_id: Vec<u8>,
    #[prost(bytes = "vec", optional, tag = "3")]
    pub span_id: Option<Vec<u8>>,
    #[prost(uint64, tag = "4")]
    pub timestamp_unix_nano: u64,
    #[prost(string, tag = "5")]
    pub event_name: String,
    #[prost(message, optional, tag = "6")]
    pub tags: Option<tags::Tags>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TracePayload {
    #[prost(message, optional, tag = "1")]
    pub sls_tags: Option<tags::SlsTags>,
    #[prost(message, repeated, tag = "2")]
    pub spans: Vec<Span>,
    #[prost(message, repeated, tag = "3")]
    pub events: Vec<Event>,
    #[prost(bool, optional, tag = "4")]
    pub is_historical: Option<bool>,
}

/// Everything gathered for one flush window, also the shape of the merged
/// transport batch.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DevModeTransportPayload {
    #[prost(string, tag = "1")]
    pub account_id: String,
    #[prost(string, tag = "2")]
    pub region: String,
    #[prost(string, tag = "3")]
    pub request_id: String,
    #[prost(message, repeated, tag = "4")]
    pub logs: Vec<LogPayload>,
    #[prost(message, repeated, tag = "5")]
    pub request_response: Vec<RequestResponse>,
    #[prost(message, repeated, tag = "6")]
    pub traces: Vec<TracePayload>,
}

impl DevModeTransportPayload {
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty() && self.request_response.is_empty() && self.traces.is_empty()
    }
}
