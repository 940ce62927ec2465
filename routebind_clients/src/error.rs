//! Error types for the library layer.

use std::fmt;

use routebind::ContractError;

use crate::{github::GitHubError, state_data::StateDataError};

/// Errors produced by the library layer, wrapping client setup failures and
/// upstream call errors, and adding failures of composed operations.
#[derive(Debug)]
pub enum ClientsError {
    /// A declared route failed to parse while the client was being built.
    Route(ContractError),
    /// The state facts client could not be built (invalid base URL or transport).
    StateData(StateDataError),
    /// A call to the GitHub API failed, or its client could not be built.
    GitHub(GitHubError),
    /// A fan-out task panicked or was aborted before producing a result.
    TaskFailed(String),
}

impl fmt::Display for ClientsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route(e) => write!(f, "Route error: {}", e),
            Self::StateData(e) => write!(f, "State data error: {}", e),
            Self::GitHub(e) => write!(f, "GitHub error: {}", e),
            Self::TaskFailed(msg) => write!(f, "Task failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Route(e) => Some(e),
            Self::StateData(e) => Some(e),
            Self::GitHub(e) => Some(e),
            Self::TaskFailed(_) => None,
        }
    }
}

impl From<ContractError> for ClientsError {
    fn from(e: ContractError) -> Self {
        Self::Route(e)
    }
}

impl From<StateDataError> for ClientsError {
    fn from(e: StateDataError) -> Self {
        Self::StateData(e)
    }
}

impl From<GitHubError> for ClientsError {
    fn from(e: GitHubError) -> Self {
        Self::GitHub(e)
    }
}
