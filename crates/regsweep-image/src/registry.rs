use async_trait::async_trait;
use regsweep_common::{SweepError, SweepResult};
use tokio::process::Command;

use crate::record::{ImageRecord, parse_listing};
use crate::reference::ImageRef;

/// Registry operations needed to sweep a repository.
#[async_trait]
pub trait ImageRegistry: Send + Sync {
    /// List every image in a repository, in the order the registry reports.
    async fn list_tags(&self, repository: &str) -> SweepResult<Vec<ImageRecord>>;

    /// Delete an image and every tag pointing at it, without prompting.
    async fn delete(&self, image: &ImageRef) -> SweepResult<()>;
}

/// Registry client backed by the `gcloud` CLI.
///
/// Authentication is whatever the CLI is already configured with.
#[derive(Debug, Clone)]
pub struct GcloudRegistry {
    bin: String,
}

impl GcloudRegistry {
    /// Create a client invoking the given binary.
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Run the CLI and return its stdout, failing on a non-zero exit.
    async fn run(&self, args: &[&str]) -> SweepResult<Vec<u8>> {
        let command_line = format!("{} {}", self.bin, args.join(" "));
        tracing::debug!(command = %command_line, "Running registry command");

        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .await
            .map_err(|source| SweepError::CommandSpawn {
                command: self.bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SweepError::CommandFailed {
                command: command_line,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl ImageRegistry for GcloudRegistry {
    async fn list_tags(&self, repository: &str) -> SweepResult<Vec<ImageRecord>> {
        let stdout = self
            .run(&["container", "images", "list-tags", repository, "--format", "json"])
            .await?;
        let records = parse_listing(repository, &stdout)?;
        tracing::debug!(repository, count = records.len(), "Listed image tags");
        Ok(records)
    }

    async fn delete(&self, image: &ImageRef) -> SweepResult<()> {
        let reference = image.to_string();
        self.run(&[
            "container",
            "images",
            "delete",
            reference.as_str(),
            "--quiet",
            "--force-delete-tags",
        ])
        .await?;
        tracing::debug!(image = %reference, "Image deleted");
        Ok(())
    }
}
