use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{MethodCall, MsgToHost, OverlayMethod};

/// Errors from encoding/decoding protocol payloads.
#[derive(Debug, Error)]
pub enum Error {
    /// A method call had no payload but the method requires one.
    #[error("missing payload for {0}")]
    MissingPayload(String),
    /// Deserialization via rmp_serde failed.
    #[error(transparent)]
    Decode(#[from] rmp_serde::decode::Error),
    /// Serialization via rmp_serde failed.
    #[error(transparent)]
    Encode(#[from] rmp_serde::encode::Error),
}

/// Encode a request payload as named msgpack.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(rmp_serde::to_vec_named(value)?)
}

/// Decode a request payload.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    Ok(rmp_serde::from_slice(bytes)?)
}

/// Decode the payload of `call`, reporting an empty payload as
/// [`Error::MissingPayload`].
pub fn decode_args<T: DeserializeOwned>(call: &MethodCall) -> Result<T, Error> {
    if call.payload.is_empty() {
        return Err(Error::MissingPayload(call.method.clone()));
    }
    decode(&call.payload)
}

/// Encode a host message.
pub fn msg_to_bytes(msg: &MsgToHost) -> Result<Vec<u8>, Error> {
    encode(msg)
}

/// Decode a host message.
pub fn bytes_to_msg(bytes: &[u8]) -> Result<MsgToHost, Error> {
    decode(bytes)
}

impl MethodCall {
    /// Build a call for `method` with an encoded request.
    pub fn new<T: Serialize>(method: OverlayMethod, req: &T) -> Result<Self, Error> {
        Ok(Self {
            method: method.as_str().to_string(),
            payload: encode(req)?,
        })
    }

    /// Build a call for a method that takes no arguments.
    pub fn bare(method: OverlayMethod) -> Self {
        Self {
            method: method.as_str().to_string(),
            payload: Vec::new(),
        }
    }
}
