//! Retention set built from release commits.
//!
//! Images whose tags mention the short hash of a released commit are never
//! swept. Matching is deliberately loose: a prefix appearing anywhere inside
//! any tag protects the image.

use std::collections::BTreeSet;

use async_trait::async_trait;
use regsweep_common::SweepResult;

/// Length of the commit prefix used as a protection key.
pub const RETENTION_PREFIX_LEN: usize = 7;

/// Source of release tags.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Commit hashes pointed at by every release tag of `repository`.
    ///
    /// `repository` is an `owner/name` identifier. Failing here must abort
    /// the sweep, since nothing could be safely kept.
    async fn release_commits(&self, repository: &str) -> SweepResult<Vec<String>>;
}

/// Short commit hashes whose images must be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionSet {
    prefixes: BTreeSet<String>,
}

impl RetentionSet {
    /// Build from full commit hashes, keeping the first seven characters of each.
    pub fn from_commits<I, S>(commits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = commits
            .into_iter()
            .map(|sha| sha.as_ref().chars().take(RETENTION_PREFIX_LEN).collect())
            .collect();
        Self { prefixes }
    }

    /// Whether any prefix occurs inside any of the given tags.
    #[must_use]
    pub fn protects<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| tags.iter().any(|tag| tag.as_ref().contains(prefix.as_str())))
    }

    /// Number of distinct prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether the set protects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Iterate over the prefixes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }
}

/// Fetch release commits and reduce them to a [`RetentionSet`].
///
/// # Errors
///
/// Propagates any error from the release source.
pub async fn build_retention_set<S>(source: &S, repository: &str) -> SweepResult<RetentionSet>
where
    S: ReleaseSource + ?Sized,
{
    let commits = source.release_commits(repository).await?;
    let retention = RetentionSet::from_commits(&commits);
    tracing::info!(
        repository,
        tags = commits.len(),
        prefixes = retention.len(),
        "Built retention set"
    );
    tracing::debug!(
        prefixes = ?retention.iter().collect::<Vec<_>>(),
        "Protected commit prefixes"
    );
    Ok(retention)
}

#[cfg(test)]
mod tests {
    use regsweep_common::SweepError;

    use super::*;

    struct StaticReleases(Vec<&'static str>);

    #[async_trait]
    impl ReleaseSource for StaticReleases {
        async fn release_commits(&self, _repository: &str) -> SweepResult<Vec<String>> {
            Ok(self.0.iter().map(ToString::to_string).collect())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl ReleaseSource for Unreachable {
        async fn release_commits(&self, repository: &str) -> SweepResult<Vec<String>> {
            Err(SweepError::RepositoryNotFound {
                repository: repository.to_string(),
            })
        }
    }

    #[test]
    fn prefixes_are_seven_chars() {
        let set = RetentionSet::from_commits([
            "abc1234def5678abc1234def5678abc1234def56",
            "abc1234ffffffffffffffffffffffffffffffff",
            "0123",
        ]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["0123", "abc1234"]);
    }

    #[test]
    fn substring_match_protects() {
        let set = RetentionSet::from_commits(["abc1234aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]);
        assert!(set.protects(&["abc1234-test"]));
        assert!(set.protects(&["latest", "1.4.0-abc1234-bullseye"]));
        assert!(!set.protects(&["v1.2.3"]));
        assert!(!set.protects::<&str>(&[]));
    }

    #[test]
    fn empty_set_protects_nothing() {
        let set = RetentionSet::default();
        assert!(set.is_empty());
        assert!(!set.protects(&["anything"]));
    }

    #[tokio::test]
    async fn build_from_source() {
        let source = StaticReleases(vec!["deadbeefcafe", "feedfacebead"]);
        let set = build_retention_set(&source, "owner/repo").await.unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.protects(&["build-feedfac"]));
    }

    #[tokio::test]
    async fn source_failure_propagates() {
        let err = build_retention_set(&Unreachable, "owner/missing")
            .await
            .unwrap_err();
        assert!(matches!(err, SweepError::RepositoryNotFound { .. }));
    }
}
