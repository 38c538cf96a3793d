// tests/trigger.rs

#![cfg(unix)]

use std::time::Duration;

use logwait::trigger::run_shell_trigger;
use logwait::{LogWaiter, PatternTable, WaitOutcome};
use logwait_test_utils::fixture::LogFixture;
use logwait_test_utils::init_tracing;

#[test]
fn successful_command_is_ok() {
    init_tracing();
    assert!(run_shell_trigger("true").is_ok());
}

#[test]
fn non_zero_exit_is_not_an_error() {
    init_tracing();
    assert!(run_shell_trigger("exit 3").is_ok());
}

#[tokio::test]
async fn shell_trigger_can_write_the_awaited_line() {
    init_tracing();
    let log = LogFixture::with_content("app.log", "");
    let cmd = format!("echo 'Process FinalRelease Completed' >> '{}'", log.path().display());

    let patterns = PatternTable::new().literal("Completed", "Completed").unwrap();
    let outcome = LogWaiter::new(log.path(), patterns)
        .timeout(Duration::from_secs(5))
        .scan_interval(Duration::from_millis(20))
        .wait_with(|| run_shell_trigger(&cmd))
        .await
        .unwrap();

    assert_eq!(outcome, WaitOutcome::Matched("Completed"));
}
