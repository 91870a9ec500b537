// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Failure to open a base64 protobuf envelope.
///
/// Always recoverable: the caller drops the record and moves on.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("Invalid base64 envelope: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid protobuf payload: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Errors surfaced by the forwarder to its caller.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("Failed to encode transport payload: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("Failed to compress transport payload: {0}")]
    Compress(#[from] std::io::Error),

    #[error("Failed to write transport payload to the log sink: {0}")]
    Sink(std::io::Error),

    #[error("Failed to publish transport payload: {0}")]
    Http(#[from] reqwest::Error),
}
