//! Inputs and outputs declared to the build runtime.
//!
//! The runtime compares a declaration against the one from the previous run
//! to decide whether the task is up to date. Only the declaration lives here;
//! the comparison does not.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::config::TaskConfiguration;
use crate::error::{Result, TaskError};
use crate::sources::InputArtifactSet;

/// Everything that determines the outcome of a task run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeclaration {
    /// Input ontology files, absolute, in processing order.
    pub input_files: Vec<PathBuf>,
    /// Directory the generator writes into, absolute.
    pub output_directory: PathBuf,
    /// Non-file inputs keyed by their task-file names. Optional inputs that
    /// are unset map to `null`.
    pub properties: BTreeMap<&'static str, Value>,
}

impl TaskDeclaration {
    /// Declares `config` applied to `inputs`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Configuration`] if the configuration is invalid
    /// or a path cannot be made absolute.
    pub fn new(config: &TaskConfiguration, inputs: &InputArtifactSet) -> Result<Self> {
        let (output_directory, package_name) = config.required()?;

        let input_files = inputs
            .iter()
            .map(|input| absolute("input", input))
            .collect::<Result<Vec<_>>>()?;

        let mut properties = BTreeMap::new();
        properties.insert("packageName", Value::from(package_name));
        properties.insert(
            "classNameSuffix",
            config
                .class_name_suffix
                .as_deref()
                .map_or(Value::Null, Value::from),
        );
        properties.insert(
            "declarations",
            config
                .declarations
                .as_ref()
                .map_or(Value::Null, |d| Value::from(d.clone())),
        );
        for flag in crate::flags::FeatureFlag::ALL {
            properties.insert(flag.key(), Value::Bool(config.is_enabled(flag)));
        }

        Ok(Self {
            input_files,
            output_directory: absolute("outputDirectory", output_directory)?,
            properties,
        })
    }

    /// Renders the declaration as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if rendering fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn absolute(field: &'static str, path: &std::path::Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .map_err(|e| TaskError::configuration(field, format!("cannot be made absolute: {e}")))
}
