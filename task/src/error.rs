//! Error types for configuration, source resolution, and generator runs.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failure reported by a [`Generator`](crate::generator::Generator).
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The generator process could not be started.
    #[error("failed to start `{program}`")]
    Spawn {
        /// Program that was being launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The generator ran and reported a failure.
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        /// Program that reported the failure.
        program: String,
        /// Exit status of the process.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Any other failure raised by a generator implementation.
    #[error("{0}")]
    Other(String),
}

/// Errors surfaced to the build runtime. Every variant is fatal for the task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A required configuration field is missing or unusable.
    #[error("invalid task configuration: `{field}` {reason}")]
    Configuration {
        /// Name of the offending field, as written in task files.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The generator failed while processing `input`.
    #[error("error while generating schema for {}", input.display())]
    Generation {
        /// Input artifact that triggered the failure.
        input: PathBuf,
        /// Cause reported by the generator.
        #[source]
        source: GeneratorError,
    },

    /// A source root could not be walked.
    #[error("failed to resolve sources under {}", path.display())]
    Sources {
        /// Root being resolved.
        path: PathBuf,
        /// Underlying traversal error.
        #[source]
        source: walkdir::Error,
    },

    /// A task file could not be read.
    #[error("failed to read task file {}", path.display())]
    TaskFileRead {
        /// Task file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A task file could not be parsed.
    #[error("failed to parse task file {}", path.display())]
    TaskFileParse {
        /// Task file path.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The run was cancelled between two inputs.
    #[error("schema generation cancelled with {remaining} input(s) left")]
    Cancelled {
        /// Inputs that were not processed.
        remaining: usize,
    },

    /// A task can only be run once.
    #[error("task cannot run again from state {state:?}")]
    NotIdle {
        /// State the task was in.
        state: crate::runner::TaskState,
    },
}

impl TaskError {
    /// Shorthand for a [`TaskError::Configuration`].
    pub fn configuration(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the input that failed, if this is a generation error.
    pub fn failed_input(&self) -> Option<&std::path::Path> {
        match self {
            Self::Generation { input, .. } => Some(input),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = TaskError> = std::result::Result<T, E>;
