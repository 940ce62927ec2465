use std::io::Write;

use anyhow::Result;
use routebind_clients::{all_contributors, GitHubClient, GitHubError};

/// Prints every contributor across `owner`'s repositories, then requests the
/// contributors of `missing_repo` to show how a GitHub error body surfaces.
///
/// Failures of either step are reported and the sequence continues.
pub async fn run(
    client: &GitHubClient,
    owner: &str,
    missing_repo: &str,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Let's fetch and print a list of the contributors to this org.")?;
    match all_contributors(client, owner).await {
        Ok(logins) => {
            for login in logins {
                writeln!(out, "{}", login)?;
            }
        }
        Err(e) => tracing::error!("Failed to list contributors for {}: {}", owner, e),
    }

    writeln!(out, "Now, let's cause an error.")?;
    match client.contributors(owner, missing_repo).await {
        Ok(contributors) => {
            tracing::warn!(
                "{}/{} unexpectedly exists ({} contributors)",
                owner,
                missing_repo,
                contributors.len()
            );
        }
        Err(GitHubError::Domain(e)) => writeln!(out, "{}", e.message)?,
        Err(e) => tracing::error!("Failed to list contributors for {}/{}: {}", owner, missing_repo, e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_happy_path(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/users/brisberg/repos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"[{"name":"R1"},{"name":"R2"}]"#),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/brisberg/R1/contributors"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"[{"login":"A"},{"login":"B"}]"#),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/brisberg/R2/contributors"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"[{"login":"B"},{"login":"C"}]"#),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn prints_contributors_then_error_message() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        Mock::given(method("GET"))
            .and(path("/repos/brisberg/some-unknown-project/contributors"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(&server.uri()).unwrap();
        let mut out = Vec::new();
        run(&client, "brisberg", "some-unknown-project", &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Let's fetch and print a list of the contributors to this org.\n\
             A\nB\nC\n\
             Now, let's cause an error.\n\
             Not Found\n"
        );
    }

    #[tokio::test]
    async fn continues_after_listing_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/brisberg/repos"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/brisberg/some-unknown-project/contributors"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(&server.uri()).unwrap();
        let mut out = Vec::new();
        run(&client, "brisberg", "some-unknown-project", &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Now, let's cause an error.\nNot Found\n"));
    }

    #[tokio::test]
    async fn non_domain_error_prints_nothing_for_second_step() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        Mock::given(method("GET"))
            .and(path("/repos/brisberg/some-unknown-project/contributors"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url(&server.uri()).unwrap();
        let mut out = Vec::new();
        run(&client, "brisberg", "some-unknown-project", &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Now, let's cause an error.\n"));
    }
}
