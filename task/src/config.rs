//! Task configuration and task files.
//!
//! A [`TaskConfiguration`] is built once per build invocation, either with the
//! fluent methods below or by loading a [`TaskFile`], and is only borrowed
//! while the task runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskError};
use crate::flags::FeatureFlag;
use crate::generator::CommandGenerator;
use crate::sources::SourceSet;

/// Options governing every invocation of one task run.
///
/// Field names serialize in camelCase to match the keys of the original
/// build DSL (`outputDirectory`, `includeSource`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskConfiguration {
    /// Directory the generator writes into. Required.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,
    /// Target package for generated classes. Required, not blank.
    #[serde(default)]
    pub package_name: Option<String>,
    /// Suffix appended to generated class names.
    #[serde(default)]
    pub class_name_suffix: Option<String>,
    /// Generator-specific directives, passed through in order.
    #[serde(default)]
    pub declarations: Option<Vec<String>>,
    /// Emit `--inference`.
    #[serde(default)]
    pub inference: bool,
    /// Emit `--ontology`.
    #[serde(default)]
    pub ontology: bool,
    /// Emit `--nostrict`.
    #[serde(default)]
    pub nostrict: bool,
    /// Emit `--includeSource`.
    #[serde(default)]
    pub include_source: bool,
    /// Emit `--noindividuals`.
    #[serde(default)]
    pub noindividuals: bool,
}

impl TaskConfiguration {
    /// Creates a configuration with both required fields set.
    pub fn new(output_directory: impl Into<PathBuf>, package_name: impl Into<String>) -> Self {
        Self {
            output_directory: Some(output_directory.into()),
            package_name: Some(package_name.into()),
            ..Self::default()
        }
    }

    /// Sets the class-name suffix.
    #[must_use]
    pub fn class_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.class_name_suffix = Some(suffix.into());
        self
    }

    /// Sets the declarations list.
    #[must_use]
    pub fn declarations<I, S>(mut self, declarations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations = Some(declarations.into_iter().map(Into::into).collect());
        self
    }

    /// Turns a feature flag on or off.
    #[must_use]
    pub fn flag(mut self, flag: FeatureFlag, enabled: bool) -> Self {
        *self.flag_mut(flag) = enabled;
        self
    }

    /// Whether `flag` is enabled.
    pub fn is_enabled(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::Inference => self.inference,
            FeatureFlag::Ontology => self.ontology,
            FeatureFlag::NoStrict => self.nostrict,
            FeatureFlag::IncludeSource => self.include_source,
            FeatureFlag::NoIndividuals => self.noindividuals,
        }
    }

    fn flag_mut(&mut self, flag: FeatureFlag) -> &mut bool {
        match flag {
            FeatureFlag::Inference => &mut self.inference,
            FeatureFlag::Ontology => &mut self.ontology,
            FeatureFlag::NoStrict => &mut self.nostrict,
            FeatureFlag::IncludeSource => &mut self.include_source,
            FeatureFlag::NoIndividuals => &mut self.noindividuals,
        }
    }

    /// Enabled flags in emission order.
    pub fn active_flags(&self) -> impl Iterator<Item = FeatureFlag> + '_ {
        FeatureFlag::ALL
            .into_iter()
            .filter(move |flag| self.is_enabled(*flag))
    }

    /// Checks the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Configuration`] naming `outputDirectory` or
    /// `packageName` when either is missing or blank.
    pub fn validate(&self) -> Result<()> {
        self.required().map(|_| ())
    }

    /// Returns the output directory and package name once both are present.
    ///
    /// # Errors
    ///
    /// Same as [`TaskConfiguration::validate`].
    pub fn required(&self) -> Result<(&Path, &str)> {
        let output_directory = match self.output_directory.as_deref() {
            None => return Err(TaskError::configuration("outputDirectory", "is required")),
            Some(dir) if dir.as_os_str().is_empty() => {
                return Err(TaskError::configuration("outputDirectory", "must not be empty"))
            }
            Some(dir) => dir,
        };
        let package_name = match self.package_name.as_deref() {
            None => return Err(TaskError::configuration("packageName", "is required")),
            Some(name) if name.trim().is_empty() => {
                return Err(TaskError::configuration("packageName", "must not be blank"))
            }
            Some(name) => name,
        };
        Ok((output_directory, package_name))
    }
}

/// Settings for the external generator program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Program to run, looked up on `PATH` when not a path.
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before the invocation tokens.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_program() -> String {
    CommandGenerator::DEFAULT_PROGRAM.to_string()
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
        }
    }
}

impl GeneratorSettings {
    /// Builds the command-line generator these settings describe.
    pub fn command(&self) -> CommandGenerator {
        CommandGenerator::new(&self.program).leading_args(self.args.iter().cloned())
    }
}

/// On-disk task description: configuration, sources, and generator.
///
/// ```toml
/// [task]
/// outputDirectory = "build/generated"
/// packageName = "com.example.onto"
/// inference = true
///
/// [sources]
/// roots = ["src/main/ontology"]
///
/// [generator]
/// program = "schemagen"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskFile {
    /// Options passed to every invocation.
    pub task: TaskConfiguration,
    /// Where the input ontologies come from.
    #[serde(default)]
    pub sources: SourceSet,
    /// Which program to run.
    #[serde(default)]
    pub generator: GeneratorSettings,
}

impl TaskFile {
    /// Parses a task file from TOML text without touching relative paths.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskFileParse`] if `text` is not a valid task file.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| TaskError::TaskFileParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Reads a task file and resolves its relative paths against the
    /// directory containing it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskFileRead`] or [`TaskError::TaskFileParse`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| TaskError::TaskFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file = Self::parse(&text, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        file.rebase(base);
        tracing::debug!(path = %path.display(), "loaded task file");
        Ok(file)
    }

    /// Joins every relative path in the file onto `base`. An empty output
    /// directory is left empty so validation still rejects it.
    pub fn rebase(&mut self, base: &Path) {
        if let Some(dir) = self
            .task
            .output_directory
            .as_mut()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            *dir = base.join(&*dir);
        }
        self.sources.roots = self.sources.roots.iter().map(|r| base.join(r)).collect();
    }
}
