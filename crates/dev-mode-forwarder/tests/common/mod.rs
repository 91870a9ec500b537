// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use dev_mode_forwarder::config::{Config, DeliveryMode};
use dev_mode_forwarder::forwarder::PayloadSink;
use dev_mode_forwarder::telemetry::LogRecord;

pub const REQUEST_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub const ACCOUNT_ID: &str = "123456789012";

pub fn config(delivery_mode: DeliveryMode, base_url: &str, runtime_api: &str) -> Arc<Config> {
    Arc::new(Config {
        region: "us-east-1".to_string(),
        function_name: "my-function".to_string(),
        log_group: "/aws/lambda/my-function".to_string(),
        log_stream: "2024/01/01/[$LATEST]abc".to_string(),
        org_id: "org-1".to_string(),
        token: "dev-token".to_string(),
        base_url: base_url.to_string(),
        runtime_api: runtime_api.to_string(),
        delivery_mode,
        ..Default::default()
    })
}

/// Parses a Telemetry API batch the way the extension receives it.
pub fn records(json: serde_json::Value) -> Vec<LogRecord> {
    serde_json::from_value(json).expect("valid telemetry batch")
}

#[derive(Default)]
pub struct MemorySink {
    pub writes: Mutex<Vec<Vec<u8>>>,
}

impl PayloadSink for MemorySink {
    fn write(&self, compressed: &[u8]) -> std::io::Result<()> {
        self.writes
            .lock()
            .expect("lock poisoned")
            .push(compressed.to_vec());
        Ok(())
    }
}
