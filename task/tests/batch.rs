//! Batch behaviour of the schemagen task against a recording generator.

use std::cell::RefCell;
use std::path::Path;

use schemagen_task::{
    FeatureFlag, Generator, GeneratorError, InputArtifactSet, SchemaGenTask, TaskConfiguration,
    TaskError, TaskState,
};

/// Records every call and fails for inputs whose path contains `fail_marker`.
#[derive(Default)]
struct RecordingGenerator {
    calls: RefCell<Vec<Vec<String>>>,
    fail_marker: Option<&'static str>,
}

impl RecordingGenerator {
    fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_marker: Some(marker),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl Generator for RecordingGenerator {
    fn generate(&self, args: &[String]) -> Result<(), GeneratorError> {
        self.calls.borrow_mut().push(args.to_vec());
        match self.fail_marker {
            Some(marker) if args.iter().any(|a| a.contains(marker)) => Err(GeneratorError::Other(
                format!("cannot parse ontology {}", args[1]),
            )),
            _ => Ok(()),
        }
    }
}

#[test]
fn end_to_end_declarations_and_inference() {
    let config = TaskConfiguration::new("/out", "com.example.onto")
        .flag(FeatureFlag::Inference, true)
        .declarations(["foo", "bar"]);
    let generator = RecordingGenerator::default();

    let report = SchemaGenTask::new(&config, &generator)
        .run(&InputArtifactSet::new(["/in/a.owl"]))
        .expect("run failed");

    assert_eq!(report.invocation_count(), 1);
    assert_eq!(
        generator.calls(),
        [[
            "-i",
            "/in/a.owl",
            "-o",
            "/out",
            "--package",
            "com.example.onto",
            "--declarations",
            "foo",
            "bar",
            "--inference"
        ]]
    );
}

#[test]
fn end_to_end_two_inputs_without_options() {
    let config = TaskConfiguration::new("/out", "com.example.onto");
    let generator = RecordingGenerator::default();

    SchemaGenTask::new(&config, &generator)
        .run(&InputArtifactSet::new(["/in/a.owl", "/in/b.owl"]))
        .expect("run failed");

    let calls = generator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0][1], "/in/a.owl");
    assert_eq!(calls[1][1], "/in/b.owl");
    assert_eq!(calls[0][2..], calls[1][2..]);
    for call in &calls {
        assert_eq!(call.len(), 6);
        assert!(call.iter().all(|t| !t.starts_with("--") || t == "--package"));
    }
}

#[test]
fn batch_halts_on_first_failure() {
    let config = TaskConfiguration::new("/out", "p");
    let generator = RecordingGenerator::failing_on("two");
    let mut task = SchemaGenTask::new(&config, &generator);

    let err = task
        .run(&InputArtifactSet::new([
            "/in/one.owl",
            "/in/two.owl",
            "/in/three.owl",
        ]))
        .expect_err("second input should fail");

    let inputs: Vec<String> = generator.calls().into_iter().map(|c| c[1].clone()).collect();
    assert_eq!(inputs, ["/in/one.owl", "/in/two.owl"]);
    assert_eq!(err.failed_input(), Some(Path::new("/in/two.owl")));
    assert_eq!(task.state(), TaskState::Failed);

    let message = format!("{err}: {}", std::error::Error::source(&err).expect("cause"));
    assert!(message.contains("/in/two.owl"));
    assert!(message.contains("cannot parse ontology"));
}

#[test]
fn flag_order_ignores_configuration_order() {
    let forward = TaskConfiguration::new("/out", "p")
        .flag(FeatureFlag::Inference, true)
        .flag(FeatureFlag::Ontology, true)
        .flag(FeatureFlag::NoStrict, true)
        .flag(FeatureFlag::IncludeSource, true)
        .flag(FeatureFlag::NoIndividuals, true);
    let mut backward = TaskConfiguration::new("/out", "p");
    for flag in FeatureFlag::ALL.into_iter().rev() {
        backward = backward.flag(flag, true);
    }

    let inputs = InputArtifactSet::new(["/in/a.owl"]);
    let a = RecordingGenerator::default();
    let b = RecordingGenerator::default();
    SchemaGenTask::new(&forward, &a).run(&inputs).expect("run failed");
    SchemaGenTask::new(&backward, &b).run(&inputs).expect("run failed");

    assert_eq!(a.calls(), b.calls());
    assert_eq!(
        a.calls()[0][6..],
        [
            "--inference",
            "--ontology",
            "--nostrict",
            "--includeSource",
            "--noindividuals"
        ]
    );
}

#[test]
fn suffix_has_exactly_one_argument() {
    let config = TaskConfiguration::new("/out", "p").class_name_suffix("Vocab");
    let generator = RecordingGenerator::default();
    SchemaGenTask::new(&config, &generator)
        .run(&InputArtifactSet::new(["/in/a.owl"]))
        .expect("run failed");

    let call = &generator.calls()[0];
    let at = call
        .iter()
        .position(|t| t == "--classnamesuffix")
        .expect("suffix flag");
    assert_eq!(call[at + 1], "Vocab");
    assert_eq!(call.len(), at + 2);
}

#[test]
fn missing_output_directory_fails_before_generation() {
    let config = TaskConfiguration {
        package_name: Some("p".to_string()),
        ..TaskConfiguration::default()
    };
    let generator = RecordingGenerator::default();

    let err = SchemaGenTask::new(&config, &generator)
        .run(&InputArtifactSet::new(["/in/a.owl"]))
        .expect_err("configuration should be rejected");

    assert!(matches!(
        err,
        TaskError::Configuration {
            field: "outputDirectory",
            ..
        }
    ));
    assert!(generator.calls().is_empty());
}

#[test]
fn empty_input_set_is_a_successful_no_op() {
    let config = TaskConfiguration::new("/out", "p");
    let generator = RecordingGenerator::default();
    let mut task = SchemaGenTask::new(&config, &generator);

    let report = task.run(&InputArtifactSet::default()).expect("run failed");
    assert_eq!(report.invocation_count(), 0);
    assert_eq!(task.state(), TaskState::Done);
}
