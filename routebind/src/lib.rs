//! Declarative HTTP route binding.
//!
//! Operations are declared once as request lines (`GET /users/{username}/repos`)
//! paired with the shape their success body decodes into. A [`Client`] binds
//! arguments, performs one exchange through a [`transport::Transport`], and
//! routes the response to the JSON decoder or to an [`ErrorDecoder`].

mod client;
mod decoder;
mod errors;
mod route;
pub mod transport;
pub use self::client::{CallOptions, CancelToken, Client, ClientConfig, LogLevel};
pub use self::decoder::{
    decode_body, decode_error, DecodeFailure, DefaultErrorDecoder, ErrorDecoder, JsonErrorDecoder,
};
pub use self::errors::{ContractError, Error, TransportError};
pub use self::route::{Invocation, Method, Operation, Params, Route};
