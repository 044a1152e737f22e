//! regsweep CLI.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use regsweep_common::{RunOptions, SweepConfig, parse_switch};
use regsweep_image::GcloudRegistry;

use crate::github::GithubReleases;
use crate::retention::build_retention_set;
use crate::sweep::Sweeper;

/// regsweep - Delete stale, unreleased images from a container registry
#[derive(Parser, Debug)]
#[command(name = "regsweep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Eligible age for cleaning (expressed in days)
    pub age: u32,

    /// If true, only report what would be deleted (yes/true/t/y/1 or no/false/f/n/0)
    #[arg(value_parser = parse_dry_run)]
    pub dryrun: Option<bool>,

    /// TOML file overriding the built-in project, repositories and source repository
    #[arg(long, env = "REGSWEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print per-repository summaries as JSON on stdout; report lines move to stderr
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

fn parse_dry_run(value: &str) -> std::result::Result<bool, String> {
    parse_switch(value).map_err(|e| e.to_string())
}

impl Cli {
    /// Options fixed for this run.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            age_threshold_days: self.age,
            dry_run: self.dryrun.unwrap_or(false),
        }
    }

    /// Load the sweep configuration, falling back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file cannot be loaded.
    pub fn load_config(&self) -> Result<SweepConfig> {
        let config = match &self.config {
            Some(path) => SweepConfig::from_file(path)?,
            None => SweepConfig::default(),
        };
        Ok(config)
    }

    /// Execute the sweep.
    ///
    /// With `--json`, stdout carries only the summary array and the report
    /// lines go to stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, the release
    /// tags cannot be fetched, a repository cannot be listed, or the report
    /// cannot be written. Failed deletions are reported, not returned.
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;
        let options = self.run_options();

        tracing::info!(
            project = %config.project,
            repositories = config.repositories.len(),
            age = options.age_threshold_days,
            dry_run = options.dry_run,
            "Starting sweep"
        );

        let releases = GithubReleases::new(&config.github_api_url)?;
        let retention = build_retention_set(&releases, &config.source_repository).await?;

        let registry = GcloudRegistry::new(config.gcloud_bin.as_str());
        let today = chrono::Local::now().date_naive();
        let sweeper = Sweeper::new(registry, retention, options, today);

        let mut report: Box<dyn Write + Send> = if self.json {
            Box::new(std::io::stderr())
        } else {
            Box::new(std::io::stdout())
        };
        let summaries = sweeper
            .run(&config.qualified_repositories(), &mut *report)
            .await?;

        if self.json {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{}", serde_json::to_string_pretty(&summaries)?)?;
        }

        Ok(())
    }
}
