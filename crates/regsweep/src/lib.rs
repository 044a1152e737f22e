//! # regsweep
//!
//! Garbage collector for container registry images.
//!
//! A sweep runs as a single sequential pipeline:
//! - Build a retention set from the commits behind source-control release tags
//! - List every image in each configured repository
//! - Decide keep/delete from the retention set and an age threshold
//! - Delete (or, in dry-run mode, report) the eligible images

#![warn(missing_docs)]

pub mod cli;
pub mod github;
pub mod policy;
pub mod report;
pub mod retention;
pub mod sweep;

pub use github::GithubReleases;
pub use policy::{AgePolicy, DeleteReason, KeepReason, Verdict, evaluate};
pub use report::{DeletionFailure, RepositorySummary};
pub use retention::{ReleaseSource, RetentionSet, build_retention_set};
pub use sweep::Sweeper;
