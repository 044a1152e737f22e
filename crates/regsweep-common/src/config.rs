//! Sweep configuration.
//!
//! [`SweepConfig`] names what gets swept (registry project, repositories)
//! and where release tags come from. Every field has a built-in default, and
//! an optional TOML file may override any subset of them:
//!
//! ```toml
//! project = "gcr.io/my-project"
//! repositories = ["daemon", "archive"]
//! source_repository = "my-org/my-repo"
//! ```
//!
//! [`RunOptions`] carries the per-invocation knobs taken from the command line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};

/// Registry project swept by default.
pub const DEFAULT_PROJECT: &str = "gcr.io/o1labs-192920";

/// Source-control repository whose tags protect images by default.
pub const DEFAULT_SOURCE_REPOSITORY: &str = "minaProtocol/mina";

/// Base URL of the GitHub REST API.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Registry CLI binary.
pub const DEFAULT_GCLOUD_BIN: &str = "gcloud";

/// Repositories swept by default, relative to the project.
pub const DEFAULT_REPOSITORIES: &[&str] = &[
    "batch_zkapp_txn_tool",
    "block-archiver",
    "mina-batch-txn",
    "mina-daemon",
    "mina-archive",
    "mina-daemon-baked",
    "mina-daemon-lightnet",
    "mina-daemon-devnet",
    "mina-daemon-instrumented",
    "mina-snapp-test-transaction",
];

/// What to sweep and where release tags come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Registry project prefix (e.g. `gcr.io/my-project`).
    pub project: String,
    /// Repository names relative to [`Self::project`].
    pub repositories: Vec<String>,
    /// Source-control repository as `owner/name`.
    pub source_repository: String,
    /// Base URL of the GitHub API.
    pub github_api_url: String,
    /// Registry CLI binary used for listing and deletion.
    pub gcloud_bin: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            repositories: DEFAULT_REPOSITORIES.iter().map(ToString::to_string).collect(),
            source_repository: DEFAULT_SOURCE_REPOSITORY.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            gcloud_bin: DEFAULT_GCLOUD_BIN.to_string(),
        }
    }
}

impl SweepConfig {
    /// Parse a configuration from TOML, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the result fails
    /// [`Self::validate`].
    pub fn from_toml(content: &str) -> SweepResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| SweepError::Config {
            message: format!("Failed to parse config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> SweepResult<Self> {
        tracing::debug!(path = %path.display(), "Loading sweep config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check that the configuration can drive a sweep.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Config`] describing the first problem found.
    pub fn validate(&self) -> SweepResult<()> {
        if self.project.trim().is_empty() {
            return Err(SweepError::Config {
                message: "project must not be empty".to_string(),
            });
        }
        if let Some(name) = self.repositories.iter().find(|r| r.trim().is_empty()) {
            return Err(SweepError::Config {
                message: format!("invalid repository name '{name}'"),
            });
        }
        split_repository_id(&self.source_repository)?;
        Ok(())
    }

    /// Fully qualified repository paths, in configuration order.
    #[must_use]
    pub fn qualified_repositories(&self) -> Vec<String> {
        let project = self.project.trim_end_matches('/');
        self.repositories
            .iter()
            .map(|name| format!("{project}/{name}"))
            .collect()
    }
}

/// Split a source-control repository identifier into `(owner, name)`.
///
/// # Errors
///
/// Returns [`SweepError::Config`] unless `id` has exactly one `/` with
/// non-empty text on both sides.
pub fn split_repository_id(id: &str) -> SweepResult<(&str, &str)> {
    match id.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(SweepError::Config {
            message: format!("source_repository must be 'owner/name', got '{id}'"),
        }),
    }
}

/// Options fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Images older than this many days are eligible.
    pub age_threshold_days: u32,
    /// Report intended deletions without performing them.
    pub dry_run: bool,
}

/// Interpret a boolean-like command line word.
///
/// Accepts `yes/true/t/y/1` and `no/false/f/n/0`, case-insensitively.
///
/// # Errors
///
/// Returns [`SweepError::InvalidArgument`] for any other value.
pub fn parse_switch(value: &str) -> SweepResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "t" | "y" | "1" => Ok(true),
        "no" | "false" | "f" | "n" | "0" => Ok(false),
        _ => Err(SweepError::InvalidArgument {
            value: value.to_string(),
        }),
    }
}
