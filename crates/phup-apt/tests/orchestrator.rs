//! End-to-end orchestrator tests against real `/bin/sh` subprocesses.

use tokio::sync::mpsc;

use phup_apt::plan::CommandSpec;
use phup_apt::run_sequence;
use phup_backend::{OperationEvent, OperationOutcome, SequencingPolicy};

fn sh(script: &str) -> CommandSpec {
    CommandSpec {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
    }
}

async fn run_and_collect(plan: Vec<CommandSpec>, policy: SequencingPolicy) -> Vec<OperationEvent> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    run_sequence(plan, policy, tx).await;

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn completion(events: &[OperationEvent]) -> &OperationOutcome {
    let completions: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            OperationEvent::Completed(outcome) => Some(outcome),
            OperationEvent::Progress(_) => None,
        })
        .collect();
    assert_eq!(completions.len(), 1, "expected exactly one completion signal");
    assert!(
        matches!(events.last(), Some(OperationEvent::Completed(_))),
        "completion must be the last event"
    );
    completions[0]
}

fn progress_values(events: &[OperationEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            OperationEvent::Progress(value) => Some(*value),
            OperationEvent::Completed(_) => None,
        })
        .collect()
}

#[tokio::test]
async fn progress_tokens_stream_in_source_order() {
    let plan = vec![sh(
        "echo 'Fetching... 12%'; echo 'Unpacking 45% done 50%'; echo 'no percent here'",
    )];

    let events = run_and_collect(plan, SequencingPolicy::ContinueOnError).await;

    assert_eq!(progress_values(&events), [0, 12, 50]);
    assert!(completion(&events).is_clean());
}

#[tokio::test]
async fn stderr_lines_are_scraped_like_stdout() {
    let plan = vec![sh("echo 'unpacking 33%' 1>&2")];

    let events = run_and_collect(plan, SequencingPolicy::ContinueOnError).await;

    assert_eq!(progress_values(&events), [0, 33]);
}

#[tokio::test]
async fn empty_plan_emits_reset_and_single_completion() {
    let events = run_and_collect(Vec::new(), SequencingPolicy::ContinueOnError).await;

    assert_eq!(progress_values(&events), [0]);
    assert!(completion(&events).is_clean());
}

#[tokio::test]
async fn failing_command_does_not_abort_the_sequence() {
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    let first = dir.path().join("first");
    let third = dir.path().join("third");

    let plan = vec![
        sh(&format!("touch {}", first.display())),
        sh("exit 7"),
        sh(&format!("touch {}", third.display())),
    ];

    let events = run_and_collect(plan, SequencingPolicy::ContinueOnError).await;

    assert!(first.exists());
    assert!(third.exists(), "third command must still run after a failure");

    let outcome = completion(&events);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].program, "sh");
    assert_eq!(outcome.failures[0].exit_code, Some(7));
}

#[tokio::test]
async fn abort_on_error_stops_at_the_first_failure() {
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    let third = dir.path().join("third");

    let plan = vec![
        sh("exit 1"),
        sh(&format!("touch {}", third.display())),
    ];

    let events = run_and_collect(plan, SequencingPolicy::AbortOnError).await;

    assert!(!third.exists(), "no command may run after an aborting failure");
    assert_eq!(completion(&events).failures.len(), 1);
}

#[tokio::test]
async fn unspawnable_command_is_recorded_and_skipped() {
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    let next = dir.path().join("next");

    let plan = vec![
        CommandSpec {
            program: "/nonexistent/phup-test-binary".to_string(),
            args: Vec::new(),
        },
        sh(&format!("touch {}", next.display())),
    ];

    let events = run_and_collect(plan, SequencingPolicy::ContinueOnError).await;

    assert!(next.exists());
    let outcome = completion(&events);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].exit_code, None);
}

#[tokio::test]
async fn commands_run_strictly_sequentially() {
    let dir = tempfile::tempdir().expect("temporary directory should be created");
    let log = dir.path().join("order.log");

    let plan = vec![
        sh(&format!("sleep 0.2; echo one >> {}", log.display())),
        sh(&format!("echo two >> {}", log.display())),
    ];

    let events = run_and_collect(plan, SequencingPolicy::ContinueOnError).await;
    assert!(completion(&events).is_clean());

    let contents = std::fs::read_to_string(&log).expect("order log should exist");
    assert_eq!(contents, "one\ntwo\n");
}
