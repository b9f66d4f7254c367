//! Tests for the session state machine.

use super::*;
use crate::error::LabError;
use crate::models::{StepCheck, StepStatus, ValidationRule};

fn three_step_lab() -> LabDefinition {
    LabDefinition::new(
        "test-lab",
        "Test Lab",
        vec![
            Step::new("where", "Where am I?")
                .with_rule(ValidationRule::command("^pwd$"))
                .with_hint("Print the working directory")
                .with_hint("The command is pwd"),
            Step::new("who", "Who am I?").with_rule(ValidationRule::command("whoami")),
            Step::new("perm", "Make it executable")
                .with_rule(ValidationRule::command(r"chmod.*u\+x.*backup\.sh")),
        ],
    )
}

/// Submits a command and fires its output timer, returning all effects.
fn run(session: &mut LabSession, command: &str) -> Vec<Effect> {
    let mut effects = session.handle(Event::Submit(command.to_string()));
    let ticket = output_ticket(&effects).expect("command was not started");
    effects.extend(session.handle(Event::TimerFired(Timer::CommandOutput { ticket })));
    effects
}

fn output_ticket(effects: &[Effect]) -> Option<u64> {
    effects.iter().find_map(|e| match e {
        Effect::Schedule(Timer::CommandOutput { ticket }) => Some(*ticket),
        _ => None,
    })
}

fn scheduled(effects: &[Effect]) -> Option<Timer> {
    effects.iter().rev().find_map(|e| match e {
        Effect::Schedule(timer @ Timer::AutoAdvance { .. })
        | Effect::Schedule(timer @ Timer::StatusReset { .. }) => Some(*timer),
        _ => None,
    })
}

#[test]
fn test_pwd_completes_step() {
    let mut session = LabSession::new(&three_step_lab());

    let effects = run(&mut session, "pwd");

    assert!(effects.contains(&Effect::Output("/home/student".to_string())));
    assert!(effects.contains(&Effect::StepCompleted {
        step_id: "where".to_string()
    }));
    assert!(session.steps()[0].completed);
    assert_eq!(session.validation_status(), ValidationStatus::Success);
    assert!(matches!(scheduled(&effects), Some(Timer::AutoAdvance { .. })));
}

#[test]
fn test_wrong_command_sets_error_then_idle() {
    let mut session = LabSession::new(&three_step_lab());
    session.handle(Event::Navigate(2));

    let effects = run(&mut session, "chmod 777 x");

    assert_eq!(session.validation_status(), ValidationStatus::Error);
    assert!(!session.steps()[2].completed);
    let timer = scheduled(&effects).expect("status reset scheduled");
    assert!(matches!(timer, Timer::StatusReset { .. }));

    session.handle(Event::TimerFired(timer));
    assert_eq!(session.validation_status(), ValidationStatus::Idle);
    assert_eq!(session.current_index(), 2);
}

#[test]
fn test_checking_while_command_in_flight() {
    let mut session = LabSession::new(&three_step_lab());
    session.handle(Event::Submit("pwd".to_string()));
    assert_eq!(session.validation_status(), ValidationStatus::Checking);
    assert!(session.is_busy());
    // Output is only recorded when the latency timer fires
    assert!(session.history().is_empty());
}

#[test]
fn test_clear_is_recorded_without_evaluation() {
    let mut session = LabSession::new(&three_step_lab());

    let effects = run(&mut session, "clear");

    assert!(effects.contains(&Effect::ClearScreen));
    assert_eq!(session.history(), vec!["clear"]);
    assert_eq!(session.transcript().last_output(), "");
    assert_eq!(session.validation_status(), ValidationStatus::Idle);
    assert!(scheduled(&effects).is_none());
    assert!(!session.steps()[0].completed);
}

#[test]
fn test_auto_advance_moves_to_next_pending() {
    let mut session = LabSession::new(&three_step_lab());

    let effects = run(&mut session, "pwd");
    let timer = scheduled(&effects).expect("auto-advance scheduled");
    let effects = session.handle(Event::TimerFired(timer));

    assert_eq!(session.current_index(), 1);
    assert!(effects.contains(&Effect::StepChanged { index: 1 }));
    assert_eq!(session.validation_status(), ValidationStatus::Idle);
}

#[test]
fn test_auto_advance_skips_completed_steps() {
    let mut session = LabSession::new(&three_step_lab());
    session.handle(Event::CompleteStep("who".to_string()));

    let effects = run(&mut session, "pwd");
    session.handle(Event::TimerFired(scheduled(&effects).unwrap()));

    assert_eq!(session.current_index(), 2);
}

#[test]
fn test_final_step_completes_lab_without_advancing() {
    let mut session = LabSession::new(&three_step_lab());
    for command in ["pwd", "whoami"] {
        let effects = run(&mut session, command);
        session.handle(Event::TimerFired(scheduled(&effects).unwrap()));
    }
    assert_eq!(session.current_index(), 2);

    let effects = run(&mut session, "chmod u+x backup.sh");
    assert!(effects.contains(&Effect::LabCompleted));
    assert_eq!(session.session_status(), SessionStatus::Complete);

    session.handle(Event::TimerFired(scheduled(&effects).unwrap()));
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.session_status(), SessionStatus::Complete);
}

#[test]
fn test_lab_completed_fires_once() {
    let lab = LabDefinition::new(
        "one",
        "One",
        vec![Step::new("pwd", "pwd").with_rule(ValidationRule::command("pwd"))],
    );
    let mut session = LabSession::new(&lab);

    let first = run(&mut session, "pwd");
    let second = run(&mut session, "pwd");

    assert_eq!(first.iter().filter(|e| **e == Effect::LabCompleted).count(), 1);
    assert!(!second.contains(&Effect::LabCompleted));
    assert!(!second
        .iter()
        .any(|e| matches!(e, Effect::StepCompleted { .. })));
}

#[test]
fn test_completed_step_is_not_reevaluated() {
    let mut session = LabSession::new(&three_step_lab());
    run(&mut session, "pwd");
    let generation = session.generation();

    let effects = run(&mut session, "ls");

    assert!(session.steps()[0].completed);
    assert_eq!(session.validation_status(), ValidationStatus::Success);
    assert_eq!(session.generation(), generation);
    assert!(scheduled(&effects).is_none());
}

#[test]
fn test_navigate_is_non_linear() {
    let mut session = LabSession::new(&three_step_lab());

    let effects = session.handle(Event::Navigate(2));

    assert_eq!(session.current_index(), 2);
    assert_eq!(session.steps()[0].status(), StepStatus::Pending);
    assert_eq!(effects, vec![Effect::StepChanged { index: 2 }]);
}

#[test]
fn test_navigate_clamps_out_of_range() {
    let mut session = LabSession::new(&three_step_lab());
    session.handle(Event::Navigate(99));
    assert_eq!(session.current_index(), 2);
}

#[test]
fn test_next_and_previous_are_bounded() {
    let mut session = LabSession::new(&three_step_lab());

    assert!(session.handle(Event::Previous).is_empty());
    assert_eq!(session.current_index(), 0);

    session.handle(Event::Next);
    session.handle(Event::Next);
    assert!(session.handle(Event::Next).is_empty());
    assert_eq!(session.current_index(), 2);

    session.handle(Event::Previous);
    assert_eq!(session.current_index(), 1);
}

#[test]
fn test_navigation_cancels_pending_auto_advance() {
    let mut session = LabSession::new(&three_step_lab());
    let effects = run(&mut session, "pwd");
    let timer = scheduled(&effects).unwrap();

    session.handle(Event::Navigate(0));
    let effects = session.handle(Event::TimerFired(timer));

    assert!(effects.is_empty());
    assert_eq!(session.current_index(), 0);
}

#[test]
fn test_reset_cancels_pending_status_reset() {
    let mut session = LabSession::new(&three_step_lab());
    let effects = run(&mut session, "ls");
    let timer = scheduled(&effects).unwrap();

    session.handle(Event::Reset);
    run(&mut session, "date");
    assert_eq!(session.validation_status(), ValidationStatus::Error);

    // The timer from before the reset must not clear the new error
    session.handle(Event::TimerFired(timer));
    assert_eq!(session.validation_status(), ValidationStatus::Error);
}

#[test]
fn test_reset_restores_initial_state() {
    let mut session = LabSession::new(&three_step_lab());
    run(&mut session, "pwd");
    session.handle(Event::Navigate(2));
    session.handle(Event::RevealHint);
    session.handle(Event::Submit("whoami".to_string()));
    session.handle(Event::Submit("ls".to_string()));

    let effects = session.handle(Event::Reset);

    assert_eq!(effects, vec![Effect::SessionReset]);
    assert!(session.steps().iter().all(|s| !s.completed));
    assert_eq!(session.current_index(), 0);
    assert!(session.history().is_empty());
    assert_eq!(session.transcript().last_command(), "");
    assert_eq!(session.transcript().last_output(), "");
    assert!(!session.is_busy());
    assert!(!session.hints_visible());
    assert_eq!(session.validation_status(), ValidationStatus::Idle);
}

#[test]
fn test_reset_drops_in_flight_output() {
    let mut session = LabSession::new(&three_step_lab());
    let effects = session.handle(Event::Submit("pwd".to_string()));
    let ticket = output_ticket(&effects).unwrap();

    session.handle(Event::Reset);
    let effects = session.handle(Event::TimerFired(Timer::CommandOutput { ticket }));

    assert!(effects.is_empty());
    assert!(session.history().is_empty());
    assert!(!session.steps()[0].completed);
}

#[test]
fn test_lab_completes_again_after_reset() {
    let lab = LabDefinition::new(
        "one",
        "One",
        vec![Step::new("pwd", "pwd").with_rule(ValidationRule::command("pwd"))],
    );
    let mut session = LabSession::new(&lab);
    run(&mut session, "pwd");
    session.handle(Event::Reset);

    let effects = run(&mut session, "pwd");
    assert!(effects.contains(&Effect::LabCompleted));
}

#[test]
fn test_history_preserves_submission_order() {
    let mut session = LabSession::new(&three_step_lab());
    let commands = ["ls", "cd /tmp", "clear", "echo hi", "pwd"];

    for command in commands {
        run(&mut session, command);
    }

    assert_eq!(session.history(), commands.to_vec());
}

#[test]
fn test_commands_queue_behind_in_flight() {
    let mut session = LabSession::new(&three_step_lab());
    let first = session.handle(Event::Submit("ls".to_string()));
    let queued = session.handle(Event::Submit("pwd".to_string()));

    assert_eq!(queued, vec![Effect::CommandQueued("pwd".to_string())]);
    assert_eq!(session.queued_commands(), 1);

    let ticket = output_ticket(&first).unwrap();
    let effects = session.handle(Event::TimerFired(Timer::CommandOutput { ticket }));

    // Finishing the first command starts the queued one
    assert!(effects.contains(&Effect::Output("my-lab".to_string())));
    assert!(effects.contains(&Effect::CommandAccepted("pwd".to_string())));
    let next = output_ticket(&effects).unwrap();
    assert_ne!(next, ticket);

    session.handle(Event::TimerFired(Timer::CommandOutput { ticket: next }));
    assert_eq!(session.history(), vec!["ls", "pwd"]);
    assert!(session.steps()[0].completed);
}

#[test]
fn test_queue_overflow_is_rejected() {
    let mut session = LabSession::new(&three_step_lab());
    session.handle(Event::Submit("ls".to_string()));
    for i in 0..MAX_QUEUED_COMMANDS {
        session.handle(Event::Submit(format!("echo {i}")));
    }

    let effects = session.handle(Event::Submit("pwd".to_string()));

    assert_eq!(effects, vec![Effect::CommandRejected("pwd".to_string())]);
    assert_eq!(session.queued_commands(), MAX_QUEUED_COMMANDS);
}

#[test]
fn test_blank_submission_is_ignored() {
    let mut session = LabSession::new(&three_step_lab());
    assert!(session.handle(Event::Submit("   ".to_string())).is_empty());
    assert!(!session.is_busy());
}

#[test]
fn test_stale_output_ticket_is_ignored() {
    let mut session = LabSession::new(&three_step_lab());
    let effects = session.handle(Event::TimerFired(Timer::CommandOutput { ticket: 42 }));
    assert!(effects.is_empty());
}

#[test]
fn test_complete_step_without_rules() {
    let lab = LabDefinition::new(
        "manual",
        "Manual",
        vec![Step::new("read", "Read the docs"), Step::new("pwd", "pwd")],
    );
    let mut session = LabSession::new(&lab);

    let effects = run(&mut session, "pwd");
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::StepCompleted { .. })));
    assert_eq!(session.validation_status(), ValidationStatus::Idle);

    let effects = session.handle(Event::CompleteStep("read".to_string()));
    assert_eq!(
        effects,
        vec![Effect::StepCompleted {
            step_id: "read".to_string()
        }]
    );
    assert_eq!(session.current_index(), 0);

    assert!(session.handle(Event::CompleteStep("missing".to_string())).is_empty());
}

#[test]
fn test_step_index_reports_unknown_step() {
    let session = LabSession::new(&three_step_lab());

    assert_eq!(session.step_index("who").unwrap(), 1);
    match session.step_index("missing") {
        Err(LabError::StepNotFound { id }) => assert_eq!(id, "missing"),
        other => panic!("expected StepNotFound, got {other:?}"),
    }
}

#[test]
fn test_transcript_records_check_against_step_at_output_time() {
    let mut session = LabSession::new(&three_step_lab());

    // Queued behind pwd; by the time whoami finishes the session has
    // navigated to the last step
    session.handle(Event::Submit("pwd".to_string()));
    session.handle(Event::Submit("whoami".to_string()));
    session.handle(Event::TimerFired(Timer::CommandOutput { ticket: 1 }));
    session.handle(Event::Navigate(2));
    session.handle(Event::TimerFired(Timer::CommandOutput { ticket: 2 }));
    run(&mut session, "clear");

    let entries = session.transcript().entries();
    assert_eq!(
        entries[0].check,
        Some(StepCheck {
            step_id: "where".to_string(),
            passed: true,
        })
    );
    assert_eq!(
        entries[1].check,
        Some(StepCheck {
            step_id: "perm".to_string(),
            passed: false,
        })
    );
    assert_eq!(entries[2].check, None);
    assert!(!session.steps()[1].completed);
}

#[test]
fn test_hints_reveal_incrementally() {
    let mut session = LabSession::new(&three_step_lab());
    assert!(session.revealed_hints().is_empty());

    session.handle(Event::ToggleHints);
    assert!(session.hints_visible());
    assert_eq!(session.revealed_hints(), ["Print the working directory"]);

    session.handle(Event::RevealHint);
    session.handle(Event::RevealHint);
    assert_eq!(session.revealed_hints().len(), 2);

    session.handle(Event::ToggleHints);
    assert!(!session.hints_visible());
    assert_eq!(session.revealed_hints().len(), 2);
}

#[test]
fn test_hint_reveals_survive_navigation() {
    let mut session = LabSession::new(&three_step_lab());
    session.handle(Event::RevealHint);
    session.handle(Event::RevealHint);

    session.handle(Event::Next);
    assert!(!session.hints_visible());
    assert!(session.revealed_hints().is_empty());

    session.handle(Event::Previous);
    assert_eq!(session.revealed_hints().len(), 2);
}

#[test]
fn test_session_works_on_a_copy() {
    let mut lab = three_step_lab();
    lab.steps[0].completed = true;

    let mut session = LabSession::new(&lab);
    assert!(!session.steps()[0].completed);

    run(&mut session, "pwd");
    assert!(!three_step_lab().steps[0].completed);
}

#[test]
fn test_snapshot_reflects_session() {
    let mut session = LabSession::new(&three_step_lab());
    run(&mut session, "pwd");
    session.handle(Event::RevealHint);

    let snapshot = session.snapshot();

    assert_eq!(snapshot.lab_id, "test-lab");
    assert_eq!(snapshot.current_step_id.as_deref(), Some("where"));
    assert_eq!(snapshot.steps[0].status, StepStatus::Completed);
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.progress.completed, 1);
    assert_eq!(snapshot.progress.percentage, 33);
    assert!(snapshot.hints.visible);
    assert_eq!(snapshot.hints.total, 2);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["currentStepIndex"], 0);
    assert_eq!(json["validation"], "success");
    assert_eq!(json["status"], "in_progress");
}
