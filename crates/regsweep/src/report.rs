//! Per-repository sweep results.

use std::io::Write;

use serde::Serialize;

/// A deletion the registry refused or could not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    /// Digest of the image that was not deleted.
    pub digest: String,
    /// Error reported by the registry client.
    pub message: String,
}

/// Outcome of sweeping one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySummary {
    /// Fully qualified repository.
    pub repository: String,
    /// Images listed.
    pub total: usize,
    /// Images the policy marked eligible.
    pub eligible: usize,
    /// Images actually deleted (always zero in dry-run mode).
    pub deleted: usize,
    /// Deletions that failed.
    pub failures: Vec<DeletionFailure>,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RepositorySummary {
    /// Empty summary for a repository.
    #[must_use]
    pub fn new(repository: impl Into<String>, dry_run: bool) -> Self {
        Self {
            repository: repository.into(),
            total: 0,
            eligible: 0,
            deleted: 0,
            failures: Vec::new(),
            dry_run,
        }
    }

    /// Count shown in the completion line: planned deletions in dry-run
    /// mode, successful ones otherwise.
    #[must_use]
    pub const fn reported(&self) -> usize {
        if self.dry_run { self.eligible } else { self.deleted }
    }

    /// Write the completion line and any failures.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        let suffix = if self.dry_run {
            "will be deleted in standard run"
        } else {
            "deleted"
        };
        writeln!(
            out,
            "{} repository cleaning completed. {} out of {} images {}",
            self.repository,
            self.reported(),
            self.total,
            suffix
        )?;

        if !self.failures.is_empty() {
            writeln!(
                out,
                "{}: {} deletion(s) failed",
                self.repository,
                self.failures.len()
            )?;
            for failure in &self.failures {
                writeln!(out, "  {}: {}", failure.digest, failure.message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(summary: &RepositorySummary) -> String {
        let mut out = Vec::new();
        summary.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn dry_run_line() {
        let summary = RepositorySummary {
            total: 12,
            eligible: 5,
            ..RepositorySummary::new("gcr.io/p/daemon", true)
        };
        assert_eq!(
            render(&summary),
            "gcr.io/p/daemon repository cleaning completed. 5 out of 12 images will be deleted in standard run\n"
        );
    }

    #[test]
    fn live_line_lists_failures() {
        let summary = RepositorySummary {
            total: 4,
            eligible: 3,
            deleted: 2,
            failures: vec![DeletionFailure {
                digest: "sha256:dead".to_string(),
                message: "gcloud exited with status 1: denied".to_string(),
            }],
            ..RepositorySummary::new("gcr.io/p/archive", false)
        };
        assert_eq!(
            render(&summary),
            "gcr.io/p/archive repository cleaning completed. 2 out of 4 images deleted\n\
             gcr.io/p/archive: 1 deletion(s) failed\n  \
             sha256:dead: gcloud exited with status 1: denied\n"
        );
    }

    #[test]
    fn serializes_for_json_report() {
        let summary = RepositorySummary::new("gcr.io/p/r", true);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["repository"], "gcr.io/p/r");
        assert_eq!(value["dry_run"], true);
        assert!(value["failures"].as_array().unwrap().is_empty());
    }
}
