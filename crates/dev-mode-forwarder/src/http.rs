// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use tracing::error;

use crate::config::Config;

/// HTTP client for the collector. A bad proxy setting is logged and the
/// client falls back to a direct connection.
#[must_use]
pub fn get_client(config: &Config) -> reqwest::Client {
    match build_client(config.proxy_url.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            error!("Unable to parse proxy configuration: {e}, falling back to direct connection");
            match build_client(None) {
                Ok(client) => client,
                Err(inner) => {
                    error!("Failed to build HTTP client without proxy: {inner}, using reqwest defaults");
                    reqwest::Client::new()
                }
            }
        }
    }
}

/// Transport defaults only, no request timeout.
pub fn build_client(proxy_url: Option<&str>) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut builder = reqwest::Client::builder().use_rustls_tls();
    if let Some(proxy) = proxy_url {
        builder = builder.proxy(reqwest::Proxy::https(proxy)?);
    }
    Ok(builder.build()?)
}
