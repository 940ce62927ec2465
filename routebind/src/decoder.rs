//! Response decoding: the success path into the declared shape, and the
//! two-tier error path (domain error, then generic status error).

use std::{convert::Infallible, fmt, marker::PhantomData};

use serde::de::DeserializeOwned;

use crate::{errors::Error, transport::ResponseEnvelope};

/// Why an [`ErrorDecoder`] could not produce its domain error.
#[derive(thiserror::Error, Debug)]
#[error("{0}")]
pub struct DecodeFailure(String);

impl DecodeFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Turns a non-success response into a surface-specific domain error.
///
/// Each response is offered to the decoder exactly once. When it fails the
/// client falls back to [`Error::HttpStatus`] with the original status and body.
pub trait ErrorDecoder: Send + Sync {
    type DomainError;

    fn decode(
        &self,
        method_key: &str,
        response: &ResponseEnvelope,
    ) -> Result<Self::DomainError, DecodeFailure>;
}

/// Never yields a domain error; every failure becomes [`Error::HttpStatus`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorDecoder;

impl ErrorDecoder for DefaultErrorDecoder {
    type DomainError = Infallible;

    fn decode(&self, _: &str, _: &ResponseEnvelope) -> Result<Infallible, DecodeFailure> {
        Err(DecodeFailure::new("no domain error shape declared"))
    }
}

/// Decodes the error body as JSON into `E`.
pub struct JsonErrorDecoder<E> {
    shape: PhantomData<fn() -> E>,
}

impl<E> JsonErrorDecoder<E> {
    pub fn new() -> Self {
        Self { shape: PhantomData }
    }
}

impl<E> Default for JsonErrorDecoder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for JsonErrorDecoder<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for JsonErrorDecoder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonErrorDecoder<{}>", std::any::type_name::<E>())
    }
}

impl<E: DeserializeOwned> ErrorDecoder for JsonErrorDecoder<E> {
    type DomainError = E;

    fn decode(&self, _: &str, response: &ResponseEnvelope) -> Result<E, DecodeFailure> {
        serde_json::from_slice(&response.body).map_err(|e| DecodeFailure::new(e.to_string()))
    }
}

/// Decodes a success body into the declared shape. A mismatch is returned as
/// [`Error::Decode`] and is not recoverable by the caller.
///
/// An empty body decodes as JSON `null`, so `Option` and `()` shapes accept it.
pub fn decode_body<R, E>(response: &ResponseEnvelope) -> Result<R, Error<E>>
where
    R: DeserializeOwned,
{
    let decoded = if response.has_empty_body() {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_slice(&response.body)
    };
    decoded.map_err(|e| {
        let body = response.body_text();
        tracing::error!(
            "Failed to parse resource: {} | body: {}",
            e,
            truncate_body(&body)
        );
        Error::Decode {
            status: response.status,
            source: e,
            body,
        }
    })
}

/// Runs the error chain for a non-success response: one attempt at the domain
/// shape, otherwise a generic status error carrying the original response.
pub fn decode_error<D>(decoder: &D, method_key: &str, response: ResponseEnvelope) -> Error<D::DomainError>
where
    D: ErrorDecoder + ?Sized,
{
    match decoder.decode(method_key, &response) {
        Ok(domain) => Error::Domain(domain),
        Err(failure) => {
            let body = response.body_text();
            tracing::error!(
                "{} failed with status {}: {} ({})",
                method_key,
                response.status,
                truncate_body(&body),
                failure
            );
            Error::HttpStatus {
                status: response.status,
                body,
            }
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
