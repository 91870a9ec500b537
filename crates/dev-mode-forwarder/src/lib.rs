// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Dev mode activity pipeline of the Lambda extension.
//!
//! One flush window of Telemetry API records goes through:
//! - [`identifiers`]: request id, trace id and lifecycle record lookups
//! - [`classifier`]: drops log lines the in-process SDK already captured
//! - [`normalizer`]: structured log events for the remaining lines
//! - [`synthesizer`]: request/response records when the SDK produced none
//! - [`aggregator`]: decodes envelopes and builds one [`AggregatedActivity`]
//! - [`forwarder`]: merges the activities of a window, gzips and delivers them
//!
//! Polling the Telemetry API and installing a `tracing` subscriber are left to
//! the host process.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod envelope;
pub mod error;
pub mod forwarder;
pub mod http;
pub mod identifiers;
pub mod instrumentation;
pub mod normalizer;
pub mod schema;
pub mod synthesizer;
pub mod telemetry;
pub mod timestamp;

/// Logs, request/response records and traces of one flush window.
pub type AggregatedActivity = schema::DevModeTransportPayload;
