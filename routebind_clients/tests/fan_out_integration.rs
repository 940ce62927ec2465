use std::sync::Arc;
use std::time::Duration;

use routebind_clients::fan_out::DEFAULT_CONCURRENCY;
use routebind_clients::{
    all_contributors, all_contributors_concurrent, ClientsError, GitHubClient, GitHubError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_repos(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/brisberg/repos"))
        .and(query_param("sort", "full_name"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(include_str!("fixtures/repos.json")),
        )
        .mount(server)
        .await;
}

async fn mount_contributors(server: &MockServer, r1_delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/repos/brisberg/R1/contributors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/contributors_r1.json"))
                .set_delay(r1_delay),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/brisberg/R2/contributors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/contributors_r2.json")),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn sequential_fan_out_dedupes_in_first_seen_order() {
    let server = MockServer::start().await;
    mount_repos(&server).await;
    mount_contributors(&server, Duration::ZERO).await;

    let github = GitHubClient::with_base_url(&server.uri()).unwrap();
    let logins = all_contributors(&github, "brisberg").await.unwrap();

    assert_eq!(logins, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn concurrent_fan_out_matches_sequential_when_first_repo_is_slow() {
    let server = MockServer::start().await;
    mount_repos(&server).await;
    mount_contributors(&server, Duration::from_millis(200)).await;

    let github = Arc::new(GitHubClient::with_base_url(&server.uri()).unwrap());
    let logins = all_contributors_concurrent(github, "brisberg", DEFAULT_CONCURRENCY)
        .await
        .unwrap();

    assert_eq!(logins, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn concurrency_of_zero_still_completes() {
    let server = MockServer::start().await;
    mount_repos(&server).await;
    mount_contributors(&server, Duration::ZERO).await;

    let github = Arc::new(GitHubClient::with_base_url(&server.uri()).unwrap());
    let logins = all_contributors_concurrent(github, "brisberg", 0)
        .await
        .unwrap();

    assert_eq!(logins, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn empty_repo_listing_yields_no_contributors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/nobody/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let github = GitHubClient::with_base_url(&server.uri()).unwrap();
    assert!(all_contributors(&github, "nobody").await.unwrap().is_empty());

    let github = Arc::new(github);
    assert!(all_contributors_concurrent(github, "nobody", 2)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn empty_repository_contributes_nothing() {
    let server = MockServer::start().await;
    mount_repos(&server).await;

    Mock::given(method("GET"))
        .and(path("/repos/brisberg/R1/contributors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/contributors_r1.json")),
        )
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/brisberg/R2/contributors"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let github = GitHubClient::with_base_url(&server.uri()).unwrap();
    let logins = all_contributors(&github, "brisberg").await.unwrap();
    assert_eq!(logins, vec!["A", "B"]);

    let github = Arc::new(github);
    let logins = all_contributors_concurrent(github, "brisberg", DEFAULT_CONCURRENCY)
        .await
        .unwrap();
    assert_eq!(logins, vec!["A", "B"]);
}

#[tokio::test]
async fn secondary_failure_propagates_domain_error() {
    let server = MockServer::start().await;
    mount_repos(&server).await;

    Mock::given(method("GET"))
        .and(path("/repos/brisberg/R1/contributors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/contributors_r1.json")),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/brisberg/R2/contributors"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({"message": "API rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let github = GitHubClient::with_base_url(&server.uri()).unwrap();
    let err = all_contributors(&github, "brisberg").await.unwrap_err();
    assert_eq!(err.to_string(), "API rate limit exceeded");

    let github = Arc::new(github);
    let err = all_contributors_concurrent(github, "brisberg", 2)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientsError::GitHub(GitHubError::Domain(ref e)) if e.message == "API rate limit exceeded"
    ));
}

#[tokio::test]
async fn primary_failure_skips_secondary_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost/repos"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Not Found"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/ghost/R1/contributors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&server)
        .await;

    let github = GitHubClient::with_base_url(&server.uri()).unwrap();
    let err = all_contributors(&github, "ghost").await.unwrap_err();
    assert_eq!(err.status(), None);
    assert_eq!(err.domain().map(|e| e.message.as_str()), Some("Not Found"));
}
