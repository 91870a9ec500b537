// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://core.serverless.com/api/ingest/forwarder";

/// Where a flushed transport batch ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// POST to the remote collector.
    #[default]
    Collector,
    /// Integration tests: write the compressed payload to the side log sink.
    LogSink,
    /// Unit tests: POST to the local testing server behind the runtime API address.
    Loopback,
}

/// Process wide, read-only settings for the forwarding pipeline.
///
/// Built once at startup and shared as `Arc<Config>`. Missing variables
/// resolve to empty strings, construction never fails.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub region: String,
    pub function_name: String,
    pub log_group: String,
    pub log_stream: String,
    pub org_id: String,
    /// Bearer token sent to the collector.
    pub token: String,
    pub base_url: String,
    /// `host:port` of the Lambda runtime API, used in loopback mode.
    pub runtime_api: String,
    pub delivery_mode: DeliveryMode,
    /// Whether the in-process SDK extension is installed in this function.
    pub internal_extension: bool,
    /// Raw `AWS_EXECUTION_ENV`, e.g. `AWS_Lambda_nodejs18.x`.
    pub execution_env: String,
    pub proxy_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Config {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        // SLS_TEST_EXTENSION_LOG wins over the loopback flag, integration tests
        // never reach the network
        let delivery_mode = if lookup("SLS_TEST_EXTENSION_LOG").is_some() {
            DeliveryMode::LogSink
        } else if lookup("SLS_TEST_EXTENSION_INTERNAL_LOG").is_some() {
            DeliveryMode::Loopback
        } else {
            DeliveryMode::Collector
        };

        let base_url = lookup("SLS_DEV_MODE_BASE_URL")
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Config {
            region: var("AWS_REGION"),
            function_name: var("AWS_LAMBDA_FUNCTION_NAME"),
            log_group: var("AWS_LAMBDA_LOG_GROUP_NAME"),
            log_stream: var("AWS_LAMBDA_LOG_STREAM_NAME"),
            org_id: var("SLS_DEV_MODE_ORG_ID"),
            token: var("SLS_DEV_TOKEN"),
            base_url,
            runtime_api: var("AWS_LAMBDA_RUNTIME_API"),
            delivery_mode,
            internal_extension: lookup("SLS_DEV_MODE_INTERNAL_EXTENSION")
                .is_some_and(|val| is_truthy(&val)),
            execution_env: var("AWS_EXECUTION_ENV"),
            proxy_url: lookup("SLS_PROXY_HTTPS")
                .or_else(|| lookup("HTTPS_PROXY"))
                .filter(|url| !url.is_empty()),
        }
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "1" | "true")
}
