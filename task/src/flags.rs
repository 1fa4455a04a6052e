//! The schemagen command-line flag surface.
//!
//! Flag spellings are fixed by the wrapped tool and must match it exactly.

/// Input ontology file (one argument).
pub const INPUT: &str = "-i";
/// Output directory (one argument).
pub const OUTPUT: &str = "-o";
/// Target package (one argument).
pub const PACKAGE: &str = "--package";
/// Class-name suffix (one argument).
pub const CLASS_NAME_SUFFIX: &str = "--classnamesuffix";
/// Generator-specific declarations (zero or more arguments).
pub const DECLARATIONS: &str = "--declarations";

/// Presence-only feature flags, declared in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureFlag {
    /// `--inference`
    Inference,
    /// `--ontology`
    Ontology,
    /// `--nostrict`
    NoStrict,
    /// `--includeSource`
    IncludeSource,
    /// `--noindividuals`
    NoIndividuals,
}

impl FeatureFlag {
    /// Every flag, in the order it is emitted.
    pub const ALL: [FeatureFlag; 5] = [
        FeatureFlag::Inference,
        FeatureFlag::Ontology,
        FeatureFlag::NoStrict,
        FeatureFlag::IncludeSource,
        FeatureFlag::NoIndividuals,
    ];

    /// The command-line token for this flag.
    pub const fn token(self) -> &'static str {
        match self {
            FeatureFlag::Inference => "--inference",
            FeatureFlag::Ontology => "--ontology",
            FeatureFlag::NoStrict => "--nostrict",
            FeatureFlag::IncludeSource => "--includeSource",
            FeatureFlag::NoIndividuals => "--noindividuals",
        }
    }

    /// The task-file key that toggles this flag.
    pub const fn key(self) -> &'static str {
        match self {
            FeatureFlag::Inference => "inference",
            FeatureFlag::Ontology => "ontology",
            FeatureFlag::NoStrict => "nostrict",
            FeatureFlag::IncludeSource => "includeSource",
            FeatureFlag::NoIndividuals => "noindividuals",
        }
    }
}
