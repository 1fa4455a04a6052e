//! Compiling a configuration and one input into a generator invocation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::TaskConfiguration;
use crate::error::{Result, TaskError};
use crate::flags;

/// One fully resolved generator call for one input artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    input: PathBuf,
    tokens: Vec<String>,
}

impl Invocation {
    /// The absolute input path this invocation was compiled for.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// The argument tokens, in order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Consumes the invocation, returning its tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.tokens.join(", "))
    }
}

/// Resolves `path` against the current directory and renders it as a token.
fn path_token(field: &'static str, path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)
        .map_err(|e| TaskError::configuration(field, format!("cannot be made absolute: {e}")))?;
    absolute
        .into_os_string()
        .into_string()
        .map_err(|raw| TaskError::configuration(field, format!("is not valid UTF-8: {raw:?}")))
}

/// Builds the invocation for one input.
///
/// Tokens are emitted as: input, output directory, package, optional class
/// name suffix, optional declarations, then the enabled feature flags in
/// their fixed order. The result depends only on `config` and `input`.
///
/// # Errors
///
/// Returns [`TaskError::Configuration`] if a required field is missing or a
/// path cannot be rendered as an absolute UTF-8 token.
pub fn compile(config: &TaskConfiguration, input: &Path) -> Result<Invocation> {
    let (output_directory, package_name) = config.required()?;

    let input_token = path_token("input", input)?;
    let mut tokens = vec![
        flags::INPUT.to_string(),
        input_token.clone(),
        flags::OUTPUT.to_string(),
        path_token("outputDirectory", output_directory)?,
        flags::PACKAGE.to_string(),
        package_name.to_string(),
    ];

    if let Some(suffix) = config.class_name_suffix.as_deref() {
        tokens.push(flags::CLASS_NAME_SUFFIX.to_string());
        tokens.push(suffix.to_string());
    }

    if let Some(declarations) = config.declarations.as_deref().filter(|d| !d.is_empty()) {
        tokens.push(flags::DECLARATIONS.to_string());
        tokens.extend(declarations.iter().cloned());
    }

    tokens.extend(config.active_flags().map(|flag| flag.token().to_string()));

    Ok(Invocation {
        input: PathBuf::from(input_token),
        tokens,
    })
}
