//! Input ontologies: the ordered artifact set and the source set it is
//! resolved from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Result, TaskError};

/// File extensions picked up from source directories when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["owl", "rdf", "ttl", "n3", "nt"];

/// Ordered, read-only collection of input ontology files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputArtifactSet {
    files: Vec<PathBuf>,
}

impl InputArtifactSet {
    /// Wraps `files`, keeping their order.
    pub fn new(files: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Iterates the inputs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }

    /// Number of inputs.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether there are no inputs.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The inputs as a slice.
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.files
    }
}

impl<'a> IntoIterator for &'a InputArtifactSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

/// Files and directories the inputs are collected from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSet {
    /// Ontology files, or directories searched recursively.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Extensions accepted inside directories (case-insensitive, no dot).
    /// Falls back to [`DEFAULT_EXTENSIONS`].
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

impl SourceSet {
    /// Creates a source set over `roots` with the default extensions.
    pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            extensions: None,
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        match &self.extensions {
            Some(exts) => exts.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => DEFAULT_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        }
    }

    /// Resolves the roots into an ordered input set.
    ///
    /// Roots are visited in the given order. A root that is a file is taken
    /// as-is regardless of its extension; a directory contributes every
    /// accepted file below it, sorted by file name. A file reached twice is
    /// kept at its first position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Sources`] if a root is missing or a directory
    /// cannot be read.
    pub fn resolve(&self) -> Result<InputArtifactSet> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for root in &self.roots {
            let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
            for entry in walker {
                let entry = entry.map_err(|source| TaskError::Sources {
                    path: root.clone(),
                    source,
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if entry.depth() > 0 && !self.accepts(entry.path()) {
                    continue;
                }
                let path = entry.into_path();
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }

        tracing::debug!(count = files.len(), "resolved source set");
        Ok(InputArtifactSet { files })
    }
}
