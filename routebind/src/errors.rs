//! Error types for the route binding layer.

use std::convert::Infallible;

/// A caller programming error: the route template or the arguments bound to
/// it do not line up. These are never produced by the remote server.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// The request line could not be parsed.
    #[error("malformed request line {line:?}: {reason}")]
    MalformedRoute { line: String, reason: &'static str },
    /// A placeholder in the template has no bound argument.
    #[error("{route}: missing argument for placeholder {{{name}}}")]
    MissingArgument { route: String, name: String },
    /// An argument was bound that no placeholder in the template consumes.
    #[error("{route}: argument {name:?} does not match any placeholder")]
    UnexpectedArgument { route: String, name: String },
}

/// Failure below HTTP: the exchange never produced a status code.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// The underlying HTTP client failed (connect, TLS, body read, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A non-reqwest transport reported a failure.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced by a single call through a [`crate::Client`].
///
/// `E` is the domain error shape of the API surface. Surfaces without a
/// structured error body use [`Infallible`].
#[derive(thiserror::Error, Debug)]
pub enum Error<E = Infallible> {
    /// The route or its arguments were invalid.
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// The base URL and the resolved path did not form a valid URL.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The request never completed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The caller-supplied deadline passed before the response arrived.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// The caller cancelled the call.
    #[error("call cancelled")]
    Cancelled,
    /// A success response whose body did not match the declared shape.
    #[error("failed to decode {status} response: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
        body: String,
    },
    /// The server returned a structured error payload.
    #[error("{0}")]
    Domain(E),
    /// A non-success response whose body did not match the domain error shape.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}

impl<E> Error<E> {
    /// Returns the HTTP status carried by this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Decode { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the decoded domain error, if this is one.
    pub fn domain(&self) -> Option<&E> {
        match self {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}
