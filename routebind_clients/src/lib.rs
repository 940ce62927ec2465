//! Library layer: typed API surfaces built on `routebind`.
//!
//! Declares the state facts and GitHub operations once per client, and adds
//! the contributor fan-out composed from the two GitHub calls.

pub mod error;
pub mod fan_out;
pub mod github;
pub mod state_data;

pub use routebind;
pub use routebind::{CallOptions, CancelToken, ClientConfig, LogLevel};

pub use error::ClientsError;
pub use fan_out::{all_contributors, all_contributors_concurrent, distinct_by_key};
pub use github::{Contributor, GitHubClient, GitHubClientError, GitHubError, Repository};
pub use state_data::{State, StateDataClient, StateDataError, StateList};
