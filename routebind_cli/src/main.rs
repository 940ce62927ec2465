mod commands;
mod output;

use anyhow::Result;
use routebind_clients::{GitHubClient, StateDataClient};

/// Owner whose repositories the GitHub step walks.
const GITHUB_OWNER: &str = "brisberg";

/// Repository that does not exist, used to trigger a GitHub error body.
const MISSING_REPO: &str = "some-unknown-project";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("routebind=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout();

    match StateDataClient::connect() {
        Ok(client) => commands::states::run(&client, &mut stdout).await?,
        Err(e) => tracing::error!("Failed to create state data client: {}", e),
    }

    match GitHubClient::connect() {
        Ok(client) => {
            commands::github::run(&client, GITHUB_OWNER, MISSING_REPO, &mut stdout).await?
        }
        Err(e) => tracing::error!("Failed to create GitHub client: {}", e),
    }

    Ok(())
}
