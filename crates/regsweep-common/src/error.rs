//! Common error types for regsweep.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`SweepError`].
pub type SweepResult<T> = Result<T, SweepError>;

/// Errors raised while building the retention set or sweeping a registry.
#[derive(Error, Diagnostic, Debug)]
pub enum SweepError {
    /// A command line value could not be interpreted.
    #[error("Invalid argument: {value}")]
    #[diagnostic(
        code(regsweep::argument::invalid),
        help("Boolean values accept yes/true/t/y/1 or no/false/f/n/0")
    )]
    InvalidArgument {
        /// The rejected value.
        value: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(regsweep::config))]
    Config {
        /// The error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(regsweep::io))]
    Io(#[from] std::io::Error),

    /// An external tool could not be started.
    #[error("Failed to run {command}: {source}")]
    #[diagnostic(
        code(regsweep::command::spawn),
        help("Make sure the tool is installed and on PATH")
    )]
    CommandSpawn {
        /// The program that failed to start.
        command: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("{command} exited with status {status}: {stderr}")]
    #[diagnostic(code(regsweep::command::failed))]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Exit code, or -1 when terminated by a signal.
        status: i32,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The registry listing could not be parsed.
    #[error("Malformed tag listing for {repository}: {message}")]
    #[diagnostic(code(regsweep::registry::malformed_listing))]
    MalformedListing {
        /// The repository being listed.
        repository: String,
        /// Parser error message.
        message: String,
    },

    /// An image timestamp did not match the registry's datetime format.
    #[error("Invalid image timestamp: {value}")]
    #[diagnostic(
        code(regsweep::registry::invalid_timestamp),
        help("Expected a datetime like '2024-01-01 12:00:00+00:00'")
    )]
    InvalidTimestamp {
        /// The rejected timestamp text.
        value: String,
    },

    /// The source-control service returned an error.
    #[error("Source control error: {message}")]
    #[diagnostic(
        code(regsweep::scm::error),
        help("Release tags are required to protect versioned images; the sweep cannot continue without them")
    )]
    SourceControl {
        /// The error message.
        message: String,
    },

    /// The source-control repository does not exist.
    #[error("Repository not found: {repository}")]
    #[diagnostic(code(regsweep::scm::not_found))]
    RepositoryNotFound {
        /// The repository identifier that was not found.
        repository: String,
    },

    /// Network error.
    #[error("Network error: {message}")]
    #[diagnostic(code(regsweep::network))]
    Network {
        /// The error message.
        message: String,
    },
}
