//! Running invocations against a generator.
//!
//! A run walks `Idle → Validating → (Compiling → Executing)* → Done`, or stops
//! in `Failed` on the first error. Inputs are processed strictly one at a
//! time, in the order given.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::config::TaskConfiguration;
use crate::error::{Result, TaskError};
use crate::generator::Generator;
use crate::invocation::{compile, Invocation};
use crate::sources::InputArtifactSet;

/// Runs one invocation.
///
/// # Errors
///
/// Returns [`TaskError::Generation`] naming the invocation's input when the
/// generator fails. Output already written by the generator is left alone.
pub fn execute<G: Generator + ?Sized>(generator: &G, invocation: &Invocation) -> Result<()> {
    tracing::info!("executing schemagen: {invocation}");
    generator
        .generate(invocation.tokens())
        .map_err(|source| TaskError::Generation {
            input: invocation.input().to_path_buf(),
            source,
        })
}

/// Where a task run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskState {
    /// Not started.
    Idle,
    /// Checking the configuration.
    Validating,
    /// Building the invocation for input `index`.
    Compiling {
        /// Position of the input in the artifact set.
        index: usize,
    },
    /// Running the generator for input `index`.
    Executing {
        /// Position of the input in the artifact set.
        index: usize,
    },
    /// Every input was processed.
    Done,
    /// The run stopped on an error. Terminal.
    Failed,
}

/// Cooperative cancellation flag, checked between inputs.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The invocation in flight still completes.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a successful run did.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    /// Invocations executed, in order.
    pub invocations: Vec<Invocation>,
}

impl RunReport {
    /// Number of generator calls made.
    pub fn invocation_count(&self) -> usize {
        self.invocations.len()
    }
}

/// The schemagen build task: one configuration, one generator.
pub struct SchemaGenTask<'a, G: ?Sized> {
    config: &'a TaskConfiguration,
    generator: &'a G,
    cancellation: Option<Cancellation>,
    state: TaskState,
}

impl<G: ?Sized> std::fmt::Debug for SchemaGenTask<'_, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaGenTask")
            .field("config", self.config)
            .field("cancellation", &self.cancellation)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a, G: Generator + ?Sized> SchemaGenTask<'a, G> {
    /// Creates an idle task.
    pub fn new(config: &'a TaskConfiguration, generator: &'a G) -> Self {
        Self {
            config,
            generator,
            cancellation: None,
            state: TaskState::Idle,
        }
    }

    /// Attaches a cancellation flag.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    /// Current state.
    pub fn state(&self) -> TaskState {
        self.state
    }

    fn transition(&mut self, next: TaskState) {
        tracing::debug!(from = ?self.state, to = ?next, "task state");
        self.state = next;
    }

    fn fail(&mut self, err: TaskError) -> TaskError {
        self.transition(TaskState::Failed);
        err
    }

    fn cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(Cancellation::is_cancelled)
    }

    /// Compiles every input without running the generator.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Configuration`] for an invalid configuration or
    /// an input that cannot be rendered.
    pub fn plan(&self, inputs: &InputArtifactSet) -> Result<Vec<Invocation>> {
        self.config.validate()?;
        inputs
            .iter()
            .map(|input| compile(self.config, input))
            .collect()
    }

    /// Runs the generator once per input, in order, stopping at the first
    /// failure.
    ///
    /// # Errors
    ///
    /// - [`TaskError::Configuration`] before any generator call.
    /// - [`TaskError::Generation`] for the first input the generator rejects;
    ///   later inputs are not processed.
    /// - [`TaskError::Cancelled`] when cancellation is seen between inputs.
    /// - [`TaskError::NotIdle`] if this task already ran.
    pub fn run(&mut self, inputs: &InputArtifactSet) -> Result<RunReport> {
        if self.state != TaskState::Idle {
            return Err(TaskError::NotIdle { state: self.state });
        }

        self.transition(TaskState::Validating);
        if let Err(err) = self.config.validate() {
            return Err(self.fail(err));
        }

        let mut report = RunReport::default();
        for (index, input) in inputs.iter().enumerate() {
            if self.cancelled() {
                let remaining = inputs.len() - index;
                tracing::warn!(remaining, "schema generation cancelled");
                return Err(self.fail(TaskError::Cancelled { remaining }));
            }

            self.transition(TaskState::Compiling { index });
            let invocation = match compile(self.config, input) {
                Ok(invocation) => invocation,
                Err(err) => return Err(self.fail(err)),
            };

            self.transition(TaskState::Executing { index });
            if let Err(err) = execute(self.generator, &invocation) {
                tracing::error!(input = %input.display(), "schemagen failed");
                return Err(self.fail(err));
            }
            report.invocations.push(invocation);
        }

        self.transition(TaskState::Done);
        tracing::info!(count = report.invocation_count(), "schema generation complete");
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use std::cell::RefCell;
    use std::path::Path;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Vec<String>>>,
        fail_on: Option<usize>,
    }

    impl Generator for Recorder {
        fn generate(&self, args: &[String]) -> std::result::Result<(), GeneratorError> {
            let mut calls = self.calls.borrow_mut();
            calls.push(args.to_vec());
            if self.fail_on == Some(calls.len() - 1) {
                return Err(GeneratorError::Other("malformed ontology".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn state_ends_done_after_success() {
        let config = TaskConfiguration::new("/out", "p");
        let generator = Recorder::default();
        let mut task = SchemaGenTask::new(&config, &generator);
        assert_eq!(task.state(), TaskState::Idle);

        let report = task.run(&InputArtifactSet::new(["/in/a.owl"])).unwrap();
        assert_eq!(report.invocation_count(), 1);
        assert_eq!(task.state(), TaskState::Done);
    }

    #[test]
    fn failed_is_terminal() {
        let config = TaskConfiguration::new("/out", "p");
        let generator = Recorder {
            fail_on: Some(0),
            ..Recorder::default()
        };
        let mut task = SchemaGenTask::new(&config, &generator);
        let inputs = InputArtifactSet::new(["/in/a.owl"]);

        assert!(matches!(task.run(&inputs), Err(TaskError::Generation { .. })));
        assert_eq!(task.state(), TaskState::Failed);
        assert!(matches!(
            task.run(&inputs),
            Err(TaskError::NotIdle {
                state: TaskState::Failed
            })
        ));
        assert_eq!(generator.calls.borrow().len(), 1);
    }

    #[test]
    fn invalid_configuration_never_reaches_generator() {
        let config = TaskConfiguration::default();
        let generator = Recorder::default();
        let mut task = SchemaGenTask::new(&config, &generator);

        match task.run(&InputArtifactSet::new(["/in/a.owl"])) {
            Err(TaskError::Configuration { field, .. }) => assert_eq!(field, "outputDirectory"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(generator.calls.borrow().is_empty());
        assert_eq!(task.state(), TaskState::Failed);
    }

    #[test]
    fn cancellation_before_run_skips_all_inputs() {
        let config = TaskConfiguration::new("/out", "p");
        let generator = Recorder::default();
        let cancellation = Cancellation::new();
        cancellation.cancel();
        let mut task = SchemaGenTask::new(&config, &generator).with_cancellation(cancellation);

        match task.run(&InputArtifactSet::new(["/in/a.owl", "/in/b.owl"])) {
            Err(TaskError::Cancelled { remaining }) => assert_eq!(remaining, 2),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(generator.calls.borrow().is_empty());
    }

    /// Cancels the run from inside the first generator call.
    struct CancelDuringFirst {
        cancellation: Cancellation,
        calls: RefCell<usize>,
    }

    impl Generator for CancelDuringFirst {
        fn generate(&self, _args: &[String]) -> std::result::Result<(), GeneratorError> {
            *self.calls.borrow_mut() += 1;
            self.cancellation.cancel();
            Ok(())
        }
    }

    #[test]
    fn cancellation_mid_run_stops_before_next_input() {
        let config = TaskConfiguration::new("/out", "p");
        let cancellation = Cancellation::new();
        let generator = CancelDuringFirst {
            cancellation: cancellation.clone(),
            calls: RefCell::new(0),
        };
        let mut task = SchemaGenTask::new(&config, &generator).with_cancellation(cancellation);

        match task.run(&InputArtifactSet::new(["/in/a.owl", "/in/b.owl"])) {
            Err(TaskError::Cancelled { remaining }) => assert_eq!(remaining, 1),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(*generator.calls.borrow(), 1);
        assert_eq!(task.state(), TaskState::Failed);
    }

    #[test]
    fn debug_shows_state_without_generator() {
        let config = TaskConfiguration::new("/out", "p");
        let generator = Recorder::default();
        let task = SchemaGenTask::new(&config, &generator);
        let rendered = format!("{task:?}");
        assert!(rendered.starts_with("SchemaGenTask {"));
        assert!(rendered.contains("state: Idle"));
    }

    #[test]
    fn plan_does_not_call_generator() {
        let config = TaskConfiguration::new("/out", "p");
        let generator = Recorder::default();
        let task = SchemaGenTask::new(&config, &generator);

        let plan = task
            .plan(&InputArtifactSet::new(["/in/a.owl", "/in/b.owl"]))
            .unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].tokens()[1], "/in/b.owl");
        assert!(generator.calls.borrow().is_empty());
        assert_eq!(task.state(), TaskState::Idle);
    }

    #[test]
    fn execute_wraps_failure_with_input() {
        let config = TaskConfiguration::new("/out", "p");
        let generator = Recorder {
            fail_on: Some(0),
            ..Recorder::default()
        };
        let invocation = compile(&config, Path::new("/in/bad.owl")).unwrap();
        let err = execute(&generator, &invocation).unwrap_err();
        assert_eq!(err.failed_input(), Some(Path::new("/in/bad.owl")));
        assert!(matches!(
            err,
            TaskError::Generation {
                source: GeneratorError::Other(_),
                ..
            }
        ));
    }
}
