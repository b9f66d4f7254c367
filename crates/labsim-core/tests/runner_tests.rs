use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use labsim_core::{
    catalog::Catalog,
    runner::{LabObserver, LabRunnerBuilder, Timing},
    session::{Effect, Event},
    LabError, ProgressRecorder, SessionStatus, ValidationStatus,
};

mod common;

/// Observer that records every callback as a string.
#[derive(Default)]
struct Recording {
    calls: Mutex<Vec<String>>,
}

impl Recording {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl LabObserver for Recording {
    fn on_command(&self, _lab_id: &str, command: &str) {
        self.calls.lock().unwrap().push(format!("command:{command}"));
    }

    fn on_output(&self, _lab_id: &str, command: &str, _output: &str) {
        self.calls.lock().unwrap().push(format!("output:{command}"));
    }

    fn on_step_complete(&self, _lab_id: &str, step_id: &str) {
        self.calls.lock().unwrap().push(format!("step:{step_id}"));
    }

    fn on_lab_complete(&self, lab_id: &str) {
        self.calls.lock().unwrap().push(format!("lab:{lab_id}"));
    }
}

#[tokio::test]
async fn test_full_lab_with_immediate_timing() {
    let recording = Arc::new(Recording::default());
    let (mut runner, mut events) = LabRunnerBuilder::new(common::three_step_lab())
        .with_timing(Timing::immediate())
        .with_observer(recording.clone())
        .build()
        .unwrap();

    for command in ["pwd", "whoami", "chmod u+x backup.sh"] {
        runner.submit(command);
        runner.run_until_settled(&mut events).await;
    }

    let session = runner.session();
    assert_eq!(session.session_status(), SessionStatus::Complete);
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.validation_status(), ValidationStatus::Idle);
    assert!(runner.is_settled());

    let calls = recording.calls();
    assert_eq!(
        calls,
        vec![
            "command:pwd",
            "output:pwd",
            "step:where",
            "command:whoami",
            "output:whoami",
            "step:who",
            "command:chmod u+x backup.sh",
            "output:chmod u+x backup.sh",
            "step:perm",
            "lab:test-lab",
        ]
    );
}

#[tokio::test]
async fn test_queued_commands_run_in_order() {
    let (mut runner, mut events) = LabRunnerBuilder::new(common::three_step_lab())
        .with_timing(Timing::immediate())
        .build()
        .unwrap();

    runner.submit("ls");
    runner.submit("pwd");
    runner.submit("clear");
    runner.run_until_settled(&mut events).await;

    assert_eq!(runner.session().history(), vec!["ls", "pwd", "clear"]);
    assert!(runner.session().steps()[0].completed);
    assert_eq!(*runner.finished_commands().borrow(), 3);
}

#[tokio::test]
async fn test_error_status_settles_to_idle() {
    let timing = Timing {
        latency_min: Duration::from_millis(5),
        latency_max: Duration::from_millis(10),
        advance_delay: Duration::from_millis(10),
        status_reset_delay: Duration::from_millis(20),
    };
    let (mut runner, mut events) = LabRunnerBuilder::new(common::three_step_lab())
        .with_timing(timing)
        .build()
        .unwrap();

    runner.submit("whoami");
    assert_eq!(runner.session().validation_status(), ValidationStatus::Checking);

    let effects = runner.run_until_settled(&mut events).await;
    assert!(effects.contains(&Effect::Output("student".to_string())));
    assert_eq!(runner.session().validation_status(), ValidationStatus::Idle);
    assert!(!runner.session().steps()[0].completed);
}

#[tokio::test]
async fn test_reset_mid_flight_ignores_stale_timers() {
    let (mut runner, mut events) = LabRunnerBuilder::new(common::three_step_lab())
        .with_timing(Timing::immediate())
        .build()
        .unwrap();

    runner.submit("pwd");
    runner.dispatch(Event::Reset);
    runner.run_until_settled(&mut events).await;

    assert!(runner.session().history().is_empty());
    assert!(!runner.session().steps()[0].completed);
    assert_eq!(*runner.finished_commands().borrow(), 0);
}

#[tokio::test]
async fn test_reset_is_counted() {
    let (mut runner, mut events) = LabRunnerBuilder::new(common::three_step_lab())
        .with_timing(Timing::immediate())
        .build()
        .unwrap();
    let mut resets = runner.resets();

    runner.submit("pwd");
    runner.dispatch(Event::Reset);

    assert!(resets.has_changed().unwrap());
    assert_eq!(*resets.borrow_and_update(), 1);
    runner.run_until_settled(&mut events).await;
    assert!(!resets.has_changed().unwrap());
}

#[tokio::test]
async fn test_complete_unknown_step_is_an_error() {
    let (mut runner, _events) = LabRunnerBuilder::new(common::three_step_lab())
        .with_timing(Timing::immediate())
        .build()
        .unwrap();

    let err = runner.complete_step("missing").unwrap_err();
    assert!(matches!(err, LabError::StepNotFound { ref id } if id == "missing"));
    assert_eq!(err.to_string(), "Step 'missing' not found");

    let effects = runner.complete_step("who").unwrap();
    assert_eq!(
        effects,
        vec![Effect::StepCompleted {
            step_id: "who".to_string()
        }]
    );
    assert!(runner.complete_step("who").unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_lab_is_rejected_by_builder() {
    let mut lab = common::three_step_lab();
    lab.steps[1].id = "where".to_string();

    let result = LabRunnerBuilder::new(lab).build();
    assert!(result.is_err());
}

#[tokio::test]
async fn test_progress_recorder_persists_completions() {
    let (_temp_dir, store) = common::create_test_store().await;
    let lab = Catalog::builtin()
        .unwrap()
        .get("linux-basics-lab")
        .unwrap()
        .clone();

    let (recorder, writer) = ProgressRecorder::spawn(store.clone(), &lab);
    let (mut runner, mut events) = LabRunnerBuilder::new(lab)
        .with_timing(Timing::immediate())
        .with_observer(Arc::new(recorder))
        .build()
        .unwrap();

    for command in ["pwd", "ls -la"] {
        runner.submit(command);
        runner.run_until_settled(&mut events).await;
    }

    // Dropping the runner drops the last recorder handle and stops the writer
    drop(runner);
    writer.await.unwrap();

    let progress = store.get_progress("linux-basics-lab").await.unwrap().unwrap();
    assert_eq!(progress.commands_executed, 2);
    assert_eq!(progress.steps_completed, 2);
    assert_eq!(progress.points_earned, 20);
    assert_eq!(progress.status, SessionStatus::InProgress);
}
