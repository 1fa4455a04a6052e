//! Build task for the Jena `schemagen` vocabulary generator.
//!
//! The task turns a [`TaskConfiguration`] and an ordered set of input
//! ontologies into one command-line [`Invocation`] per input, runs each
//! through a [`Generator`], and reports the first failure as a build error.
//! The generator itself is an external collaborator: this crate only
//! assembles its arguments and interprets its exit.
//!
//! # Entry Point
//!
//! ```no_run
//! use schemagen_task::{CommandGenerator, FeatureFlag, InputArtifactSet, SchemaGenTask, TaskConfiguration};
//!
//! let config = TaskConfiguration::new("/out", "com.example.onto")
//!     .declarations(["foo", "bar"])
//!     .flag(FeatureFlag::Inference, true);
//! let generator = CommandGenerator::default();
//! let inputs = InputArtifactSet::new(["/in/a.owl"]);
//!
//! let report = SchemaGenTask::new(&config, &generator).run(&inputs)?;
//! assert_eq!(report.invocation_count(), 1);
//! # Ok::<(), schemagen_task::TaskError>(())
//! ```
//!
//! # Flag Surface
//!
//! | Option | Tokens |
//! |--------|--------|
//! | input file | `-i <path>` |
//! | `outputDirectory` | `-o <path>` |
//! | `packageName` | `--package <name>` |
//! | `classNameSuffix` | `--classnamesuffix <suffix>` |
//! | `declarations` | `--declarations <tok>...` |
//! | booleans | `--inference --ontology --nostrict --includeSource --noindividuals` |

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod declaration;
pub mod error;
pub mod flags;
pub mod generator;
pub mod invocation;
pub mod runner;
pub mod sources;

pub use config::{GeneratorSettings, TaskConfiguration, TaskFile};
pub use declaration::TaskDeclaration;
pub use error::{GeneratorError, TaskError};
pub use flags::FeatureFlag;
pub use generator::{CommandGenerator, Generator};
pub use invocation::{compile, Invocation};
pub use runner::{execute, Cancellation, RunReport, SchemaGenTask, TaskState};
pub use sources::{InputArtifactSet, SourceSet};
