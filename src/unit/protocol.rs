//! # Request/response envelopes.
//!
//! Both directions carry the same shape, `{ payload: T }`, encoded as named
//! MessagePack. Payloads are copied across the channel; nothing is shared.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ProtocolError;

#[derive(Serialize)]
struct OutgoingEnvelope<'a, T> {
    payload: &'a T,
}

#[derive(Deserialize)]
struct IncomingEnvelope<T> {
    payload: T,
}

/// Encodes `payload` into an envelope.
pub(crate) fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(rmp_serde::to_vec_named(&OutgoingEnvelope { payload })?)
}

/// Decodes an envelope and returns its payload.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    let envelope: IncomingEnvelope<T> = rmp_serde::from_slice(bytes)?;
    Ok(envelope.payload)
}
