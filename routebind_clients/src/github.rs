//! Client for the GitHub REST API: repositories and contributors.

use std::fmt;

use routebind::{
    transport::{ReqwestTransport, Transport},
    Client, ClientConfig, JsonErrorDecoder, Operation, Params,
};
use serde::Deserialize;

use crate::error::ClientsError;

/// Production base URL of the GitHub API.
pub const GITHUB_BASE_URL: &str = "https://api.github.com";

/// Errors from GitHub calls, with [`GitHubClientError`] as the domain shape.
pub type GitHubError = routebind::Error<GitHubClientError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contributor {
    pub login: String,
}

/// Structured error body returned by GitHub, e.g. `{"message": "Not Found"}`.
/// Other fields such as `documentation_url` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubClientError {
    pub message: String,
}

impl fmt::Display for GitHubClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GitHubClientError {}

/// Typed client for the GitHub repository and contributor endpoints.
pub struct GitHubClient<T = ReqwestTransport> {
    client: Client<T, JsonErrorDecoder<GitHubClientError>>,
    repos: Operation<Vec<Repository>>,
    contributors: Operation<Vec<Contributor>>,
}

impl GitHubClient {
    /// Connects to api.github.com with default settings.
    pub fn connect() -> Result<Self, ClientsError> {
        Self::with_config(ClientConfig::new(GITHUB_BASE_URL))
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientsError> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientsError> {
        Self::from_client(Client::build(config, JsonErrorDecoder::new())?)
    }
}

impl<T: Transport> GitHubClient<T> {
    /// Wraps an existing client and declares the GitHub operations.
    pub fn from_client(
        client: Client<T, JsonErrorDecoder<GitHubClientError>>,
    ) -> Result<Self, ClientsError> {
        Ok(Self {
            client,
            repos: Operation::parse(
                "GitHub#repos(owner)",
                "GET /users/{username}/repos?sort=full_name",
            )?
            .default_on_empty(),
            contributors: Operation::parse(
                "GitHub#contributors(owner,repo)",
                "GET /repos/{owner}/{repo}/contributors",
            )?
            .default_on_empty(),
        })
    }

    /// Lists the repositories owned by `owner`, sorted by full name.
    pub async fn repos(&self, owner: &str) -> Result<Vec<Repository>, GitHubError> {
        self.client
            .call(&self.repos, &Params::new().with("username", owner))
            .await
    }

    /// Lists the contributors of `owner/repo`. An empty repository answers
    /// `204 No Content`, which yields an empty list.
    pub async fn contributors(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Contributor>, GitHubError> {
        let params = Params::new().with("owner", owner).with("repo", repo);
        self.client.call(&self.contributors, &params).await
    }
}
