//! Fan-out composition: one primary listing, one secondary call per listed
//! item, results flattened and deduplicated in first-seen order.
//!
//! The concurrent variant uses Semaphore + JoinSet and waits for every
//! secondary call before deduplicating, so its output matches the sequential
//! variant exactly.

use std::{collections::HashSet, future::Future, hash::Hash, sync::Arc};

use routebind::transport::Transport;
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    error::ClientsError,
    github::{Contributor, GitHubClient, GitHubError},
};

/// Default number of in-flight secondary calls for the concurrent fan-out.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Keeps the first item for each key, preserving input order.
pub fn distinct_by_key<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Calls `secondary` once per primary item, in order, and concatenates the
/// results. Stops at the first error.
pub async fn flat_map_sequential<P, S, E, F, Fut>(primary: Vec<P>, mut secondary: F) -> Result<Vec<S>, E>
where
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<Vec<S>, E>>,
{
    let mut out = Vec::new();
    for item in primary {
        out.extend(secondary(item).await?);
    }
    Ok(out)
}

/// Lists every contributor login across all repositories owned by `owner`.
pub async fn all_contributors<T: Transport>(
    github: &GitHubClient<T>,
    owner: &str,
) -> Result<Vec<String>, GitHubError> {
    let repos = github.repos(owner).await?;
    tracing::debug!("Fetching contributors for {} repositories of {}", repos.len(), owner);

    let contributors = flat_map_sequential(repos, |repo| async move {
        github.contributors(owner, &repo.name).await
    })
    .await?;

    Ok(logins(contributors))
}

/// Same result as [`all_contributors`], with up to `concurrency` contributor
/// calls in flight. If several calls fail, the error of the earliest
/// repository in listing order is returned.
pub async fn all_contributors_concurrent<T>(
    github: Arc<GitHubClient<T>>,
    owner: &str,
    concurrency: usize,
) -> Result<Vec<String>, ClientsError>
where
    T: Transport + 'static,
{
    let repos = github.repos(owner).await?;
    tracing::debug!(
        "Fetching contributors for {} repositories of {} ({} at a time)",
        repos.len(),
        owner,
        concurrency
    );

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut join_set = JoinSet::new();

    for (idx, repo) in repos.into_iter().enumerate() {
        let sem = Arc::clone(&semaphore);
        let github = Arc::clone(&github);
        let owner = owner.to_string();

        join_set.spawn(async move {
            let _permit = sem.acquire_owned().await.ok();
            let result = github.contributors(&owner, &repo.name).await;
            (idx, result)
        });
    }

    let mut slots: Vec<Option<Result<Vec<Contributor>, GitHubError>>> =
        (0..join_set.len()).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, result)) => slots[idx] = Some(result),
            Err(e) => {
                tracing::error!("Contributor task failed: {}", e);
                return Err(ClientsError::TaskFailed(e.to_string()));
            }
        }
    }

    let mut contributors = Vec::new();
    for slot in slots {
        match slot {
            Some(result) => contributors.extend(result?),
            None => return Err(ClientsError::TaskFailed("missing task result".to_string())),
        }
    }

    Ok(logins(contributors))
}

fn logins(contributors: Vec<Contributor>) -> Vec<String> {
    distinct_by_key(contributors.into_iter().map(|c| c.login), |login| login.clone())
}
