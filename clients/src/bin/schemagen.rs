//! `schemagen-task` — Runs the Jena schemagen generator once per input ontology.
//!
//! Reads a task file, resolves its source set, and invokes the configured
//! generator for every input in order. The first failing input fails the run.
//!
//! **Usage:**
//! ```
//! schemagen-task [--config <path>] [--dry-run | --declare] [-v | -q] [SOURCES...]
//! ```
//!
//! Positional `SOURCES` replace the roots listed in the task file.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use schemagen_task::{SchemaGenTask, TaskDeclaration, TaskFile};
use tracing_subscriber::EnvFilter;

/// Run the schemagen build task.
#[derive(Parser)]
#[command(
    name = "schemagen-task",
    about = "Generate vocabulary classes from ontologies with Jena schemagen",
    version
)]
struct Args {
    /// Task file describing the configuration, sources, and generator.
    #[arg(long, default_value = "schemagen.toml")]
    config: PathBuf,

    /// Print the invocations as JSON without running the generator.
    #[arg(long, conflicts_with = "declare")]
    dry_run: bool,

    /// Print the task's input/output declaration as JSON and exit.
    #[arg(long)]
    declare: bool,

    /// Log debug output, including generator stdout.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,

    /// Ontology files or directories, overriding the task file's roots.
    #[arg(value_name = "SOURCES")]
    sources: Vec<PathBuf>,
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let mut file = TaskFile::load(&args.config)
        .with_context(|| format!("Failed to load task file: {}", args.config.display()))?;
    if !args.sources.is_empty() {
        file.sources.roots = args.sources.clone();
    }

    let inputs = file
        .sources
        .resolve()
        .context("Failed to resolve ontology sources")?;
    if inputs.is_empty() {
        tracing::warn!("no ontology sources found");
    }

    if args.declare {
        let declaration = TaskDeclaration::new(&file.task, &inputs)?;
        println!("{}", declaration.to_json()?);
        return Ok(());
    }

    let generator = file.generator.command();
    let mut task = SchemaGenTask::new(&file.task, &generator);

    if args.dry_run {
        let plan = task.plan(&inputs)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let report = task.run(&inputs).context("Schema generation failed")?;
    println!(
        "Generated vocabularies for {} ontolog{}.",
        report.invocation_count(),
        if report.invocation_count() == 1 { "y" } else { "ies" }
    );
    Ok(())
}
