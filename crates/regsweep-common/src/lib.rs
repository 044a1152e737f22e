//! # regsweep-common
//!
//! Shared types for the regsweep workspace.
//!
//! This crate provides:
//! - The error taxonomy used by every regsweep crate
//! - Sweep configuration (registry project, repositories, source repository)
//! - Per-run options (age threshold, dry-run)

#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::{RunOptions, SweepConfig, parse_switch, split_repository_id};
pub use error::{SweepError, SweepResult};
