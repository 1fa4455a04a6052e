//! The external generator collaborator.
//!
//! The task never parses ontologies itself; it hands each invocation to a
//! [`Generator`]. [`CommandGenerator`] runs the schemagen command-line tool.

use std::ffi::OsString;
use std::process::{Command, Stdio};

use crate::error::GeneratorError;

/// Runs one generator call with a complete argument list.
pub trait Generator {
    /// Generates code for the arguments of one invocation, blocking until done.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneratorError`] when the generator reports a failure.
    fn generate(&self, args: &[String]) -> Result<(), GeneratorError>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(&self, args: &[String]) -> Result<(), GeneratorError> {
        (**self).generate(args)
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self, args: &[String]) -> Result<(), GeneratorError> {
        (**self).generate(args)
    }
}

/// Generator backed by an external program.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: OsString,
    leading_args: Vec<String>,
}

impl CommandGenerator {
    /// Program name used when none is configured.
    pub const DEFAULT_PROGRAM: &'static str = "schemagen";

    /// Creates a generator that runs `program`.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before the invocation tokens, e.g.
    /// `["-cp", "jena.jar", "jena.schemagen"]` when `program` is `java`.
    #[must_use]
    pub fn leading_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.leading_args = args.into_iter().collect();
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Default for CommandGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

/// Non-blank lines of captured tool output.
fn tool_lines(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

impl Generator for CommandGenerator {
    fn generate(&self, args: &[String]) -> Result<(), GeneratorError> {
        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GeneratorError::Spawn {
                program: self.program_name(),
                source,
            })?;

        for line in tool_lines(&output.stdout) {
            tracing::debug!(target: "schemagen", "{line}");
        }

        if !output.status.success() {
            return Err(GeneratorError::Failed {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // schemagen reports recoverable problems on stderr and still exits 0.
        for line in tool_lines(&output.stderr) {
            tracing::warn!(target: "schemagen", "{line}");
        }

        Ok(())
    }
}
