// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use prost::Message;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, error};

use crate::config::{Config, DeliveryMode};
use crate::error::ForwardError;
use crate::http::get_client;
use crate::schema::DevModeTransportPayload;
use crate::AggregatedActivity;

pub const DEV_MODE_PATH: &str = "/dev";
/// Prefix of the line written by [`StdoutSink`]. Starts with the telemetry
/// marker so the normalizer never forwards it again.
pub const SINK_LINE_PREFIX: &str = "SERVERLESS_TELEMETRY.DM.";

const GZIP_CONTENT_TYPE: &str = "application/gzip";
const TOKEN_TYPE_HEADER: &str = "sls-token-type";
const TOKEN_TYPE: &str = "orgToken";

/// All activity of one delivery cycle, merged into a single payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportBatch(DevModeTransportPayload);

impl TransportBatch {
    /// Adopts the identifiers of the first activity and concatenates the
    /// rest in order.
    pub fn merge(activities: impl IntoIterator<Item = AggregatedActivity>) -> Self {
        let mut activities = activities.into_iter();
        let Some(mut merged) = activities.next() else {
            return TransportBatch::default();
        };
        for activity in activities {
            merged.logs.extend(activity.logs);
            merged.request_response.extend(activity.request_response);
            merged.traces.extend(activity.traces);
        }
        TransportBatch(merged)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn payload(&self) -> &DevModeTransportPayload {
        &self.0
    }

    pub fn encode(&self) -> Result<Vec<u8>, ForwardError> {
        let mut buf = Vec::with_capacity(self.0.encoded_len());
        self.0.encode(&mut buf)?;
        Ok(buf)
    }

    /// Protobuf encoded, then gzipped.
    pub fn compress(&self) -> Result<Vec<u8>, ForwardError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.encode()?)?;
        Ok(encoder.finish()?)
    }
}

/// Side channel receiving the compressed batch in log sink mode.
pub trait PayloadSink: Send + Sync {
    fn write(&self, compressed: &[u8]) -> std::io::Result<()>;
}

/// Writes the batch as one base64 line to stdout, where the platform picks it
/// up into the function's log stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// `SERVERLESS_TELEMETRY.DM.<base64 of the gzipped batch>`
    pub fn line(compressed: &[u8]) -> String {
        format!(
            "{SINK_LINE_PREFIX}{}",
            base64::engine::general_purpose::STANDARD.encode(compressed)
        )
    }
}

impl PayloadSink for StdoutSink {
    fn write(&self, compressed: &[u8]) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", StdoutSink::line(compressed))?;
        stdout.flush()
    }
}

#[async_trait]
pub trait ActivityForwarder {
    /// Delivers the activity of one flush window. Any HTTP response is
    /// returned as its status code, only transport failures are errors.
    /// Nothing is retried.
    async fn forward(
        &self,
        activities: Vec<AggregatedActivity>,
    ) -> Result<StatusCode, ForwardError>;
}

pub struct DevModeForwarder {
    config: Arc<Config>,
    client: reqwest::Client,
    sink: Arc<dyn PayloadSink>,
}

impl DevModeForwarder {
    pub fn new(config: Arc<Config>) -> Self {
        let client = get_client(&config);
        DevModeForwarder {
            config,
            client,
            sink: Arc::new(StdoutSink),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn PayloadSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Collector URL, or the local testing server in loopback mode.
    pub fn destination(&self) -> String {
        match self.config.delivery_mode {
            DeliveryMode::Loopback => {
                if self.config.runtime_api.is_empty() {
                    error!("AWS_LAMBDA_RUNTIME_API is not set");
                }
                format!("http://{}/save{DEV_MODE_PATH}", self.config.runtime_api)
            }
            DeliveryMode::Collector | DeliveryMode::LogSink => {
                format!("{}{DEV_MODE_PATH}", self.config.base_url)
            }
        }
    }

    async fn publish(&self, body: Vec<u8>) -> Result<StatusCode, ForwardError> {
        let url = self.destination();
        debug!("Publishing {} bytes to {url}", body.len());

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, GZIP_CONTENT_TYPE)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(TOKEN_TYPE_HEADER, TOKEN_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to publish dev mode activity: {e}");
                ForwardError::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            debug!("Published dev mode activity: {status}");
        } else {
            error!(
                "{status}: Failed to publish dev mode activity: {:?}",
                response.text().await.unwrap_or_default()
            );
        }
        Ok(status)
    }
}

#[async_trait]
impl ActivityForwarder for DevModeForwarder {
    async fn forward(
        &self,
        activities: Vec<AggregatedActivity>,
    ) -> Result<StatusCode, ForwardError> {
        let batch = TransportBatch::merge(activities);
        if batch.is_empty() {
            debug!("Nothing to forward");
            return Ok(StatusCode::OK);
        }
        let compressed = batch.compress()?;

        if self.config.delivery_mode == DeliveryMode::LogSink {
            self.sink.write(&compressed).map_err(ForwardError::Sink)?;
            return Ok(StatusCode::OK);
        }
        self.publish(compressed).await
    }
}
