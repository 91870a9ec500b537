// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Base64 text wrapping of protobuf messages, as written by the SDKs into
//! `reqRes` and `spans` telemetry records.

use base64::Engine;
use prost::Message;

use crate::error::EnvelopeError;

pub fn decode_envelope<M>(envelope: &str) -> Result<M, EnvelopeError>
where
    M: Message + Default,
{
    let raw = base64::engine::general_purpose::STANDARD.decode(envelope.trim())?;
    Ok(M::decode(raw.as_slice())?)
}

pub fn encode_envelope<M: Message>(message: &M) -> String {
    base64::engine::general_purpose::STANDARD.encode(message.encode_to_vec())
}
