//! GitHub release tags.

use async_trait::async_trait;
use regsweep_common::{SweepError, SweepResult, split_repository_id};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;

use crate::retention::ReleaseSource;

/// Tags requested per page (GitHub's maximum).
const PAGE_SIZE: u32 = 100;

/// Release source reading the tags of a GitHub repository.
///
/// Requests are anonymous, so they are subject to GitHub's unauthenticated
/// rate limit.
pub struct GithubReleases {
    client: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

impl GithubReleases {
    /// Create a client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Network`] if the HTTP client cannot be built.
    pub fn new(api_url: &str) -> SweepResult<Self> {
        let client = Client::builder()
            .user_agent(format!("regsweep/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SweepError::Network {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn tags_url(&self, repository: &str) -> SweepResult<String> {
        let (owner, name) = split_repository_id(repository)?;
        Ok(format!(
            "{}/repos/{owner}/{name}/tags?per_page={PAGE_SIZE}",
            self.api_url
        ))
    }

    async fn fetch_page(
        &self,
        repository: &str,
        url: &str,
    ) -> SweepResult<(Vec<TagEntry>, Option<String>)> {
        tracing::debug!(url = %url, "Fetching release tags");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| SweepError::SourceControl {
                message: format!("Failed to request tags: {e}"),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SweepError::RepositoryNotFound {
                repository: repository.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(SweepError::SourceControl {
                message: format!("GitHub returned {} for {url}", response.status()),
            });
        }

        let next = response
            .headers()
            .get(header::LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_url);

        let tags = response
            .json::<Vec<TagEntry>>()
            .await
            .map_err(|e| SweepError::SourceControl {
                message: format!("Failed to parse tags response: {e}"),
            })?;

        Ok((tags, next))
    }
}

#[async_trait]
impl ReleaseSource for GithubReleases {
    async fn release_commits(&self, repository: &str) -> SweepResult<Vec<String>> {
        let mut url = Some(self.tags_url(repository)?);
        let mut commits = Vec::new();

        while let Some(page) = url.take() {
            let (tags, next) = self.fetch_page(repository, &page).await?;
            for tag in tags {
                tracing::trace!(tag = %tag.name, sha = %tag.commit.sha, "Release tag");
                commits.push(tag.commit.sha);
            }
            url = next;
        }

        Ok(commits)
    }
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header.
fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .is_some_and(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
        });
        if is_next {
            target
                .strip_prefix('<')
                .and_then(|t| t.strip_suffix('>'))
                .map(ToString::to_string)
        } else {
            None
        }
    })
}
