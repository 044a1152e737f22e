//! Sweep execution.
//!
//! [`Sweeper`] walks repositories one at a time and images in listing order,
//! evaluating each image and deleting (or reporting) the eligible ones.
//! Report lines go to the caller's writer; diagnostics go through `tracing`.

use std::io::Write;

use chrono::NaiveDate;
use regsweep_common::{RunOptions, SweepResult};
use regsweep_image::{ImageRef, ImageRegistry};

use crate::policy::{AgePolicy, DeleteReason, Verdict, evaluate};
use crate::report::{DeletionFailure, RepositorySummary};
use crate::retention::RetentionSet;

/// Applies the retention policy to registry repositories.
pub struct Sweeper<R> {
    registry: R,
    retention: RetentionSet,
    policy: AgePolicy,
    dry_run: bool,
}

impl<R: ImageRegistry> Sweeper<R> {
    /// Create a sweeper resolving ages against `today`.
    pub fn new(registry: R, retention: RetentionSet, options: RunOptions, today: NaiveDate) -> Self {
        Self {
            registry,
            retention,
            policy: AgePolicy::new(today, options.age_threshold_days),
            dry_run: options.dry_run,
        }
    }

    /// The registry client.
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Sweep every repository in order.
    ///
    /// # Errors
    ///
    /// Stops at the first repository whose listing fails, or if writing the
    /// report fails. Deletion failures are recorded in the summaries instead.
    pub async fn run<W: Write + ?Sized>(
        &self,
        repositories: &[String],
        out: &mut W,
    ) -> SweepResult<Vec<RepositorySummary>> {
        let mut summaries = Vec::with_capacity(repositories.len());
        for repository in repositories {
            summaries.push(self.sweep_repository(repository, &mut *out).await?);
        }
        Ok(summaries)
    }

    /// Sweep a single repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails or the report cannot be written.
    pub async fn sweep_repository<W: Write + ?Sized>(
        &self,
        repository: &str,
        out: &mut W,
    ) -> SweepResult<RepositorySummary> {
        writeln!(out, "Cleaning {repository} repository... it may take a while")?;
        tracing::info!(
            repository,
            cutoff = %self.policy.cutoff(),
            dry_run = self.dry_run,
            "Sweeping repository"
        );

        let records = self.registry.list_tags(repository).await?;

        let mut summary = RepositorySummary::new(repository, self.dry_run);
        summary.total = records.len();

        for record in &records {
            let reason = match evaluate(record, &self.retention, &self.policy) {
                Verdict::Keep(keep) => {
                    tracing::trace!(digest = %record.digest, reason = ?keep, "Keeping image");
                    continue;
                }
                Verdict::Delete(reason) => reason,
            };

            summary.eligible += 1;
            let image = ImageRef::new(repository, record.digest.as_str());
            self.delete(&image, reason, &mut summary, &mut *out).await?;
        }

        summary.write_to(out)?;
        tracing::info!(
            repository,
            total = summary.total,
            eligible = summary.eligible,
            deleted = summary.deleted,
            failed = summary.failures.len(),
            "Repository swept"
        );
        Ok(summary)
    }

    async fn delete<W: Write + ?Sized>(
        &self,
        image: &ImageRef,
        reason: DeleteReason,
        summary: &mut RepositorySummary,
        out: &mut W,
    ) -> SweepResult<()> {
        if self.dry_run {
            writeln!(
                out,
                "[DRYRUN]: {}: deleting {} because {reason}",
                image.repository,
                image.short_digest()
            )?;
            return Ok(());
        }

        writeln!(
            out,
            "{}: deleting {} because {reason}",
            image.repository,
            image.short_digest()
        )?;

        match self.registry.delete(image).await {
            Ok(()) => summary.deleted += 1,
            Err(e) => {
                tracing::warn!(image = %image, error = %e, "Deletion failed");
                summary.failures.push(DeletionFailure {
                    digest: image.digest.clone(),
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }
}
