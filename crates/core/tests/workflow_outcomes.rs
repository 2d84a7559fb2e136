//! End-to-end workflow runs against the in-memory panel.
//!
//! Each test drives the full state machine and asserts both the terminal
//! outcome and, where it matters, the exact operations performed; the
//! skip path in particular must never write to the panel.

use softlimit::testing::{MemoryDiagnostics, MockPanel, PanelCall};
use softlimit::{LimitWorkflow, Outcome, RunConfig, Status};

const LIMIT_SELECTOR: &str = r#"[input-validator="softLimitValidator"]"#;

fn config(desired: i64) -> RunConfig {
    RunConfig::new("http://inverter.local", "hunter2", desired)
}

async fn run(panel: &MockPanel, cfg: &RunConfig) -> Outcome {
    let sink = MemoryDiagnostics::default();
    LimitWorkflow::new(cfg, &sink).run(panel).await
}

#[tokio::test]
async fn matching_limit_is_skipped() {
    let panel = MockPanel::ready("5000");
    let outcome = run(&panel, &config(5000)).await;

    assert_eq!(outcome.status, Status::Skipped);
    assert_eq!(outcome.desired_limit, 5000);
    assert_eq!(outcome.current_limit.as_deref(), Some("5000"));
    assert!(outcome.new_limit.is_none());
    assert!(outcome.diagnostic_reference.is_none());
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
async fn skip_performs_no_write() {
    let panel = MockPanel::ready("5000");
    run(&panel, &config(5000)).await;

    let calls = panel.calls();
    assert!(calls
        .iter()
        .all(|call| !matches!(call, PanelCall::Clear(_) | PanelCall::Click(_))));
    // The only keystrokes are the password; nothing touches the limit field.
    assert!(calls.iter().all(|call| match call {
        PanelCall::SendKeys { selector, .. } => selector != LIMIT_SELECTOR,
        _ => true,
    }));
    // The confirm buttons are never even looked up.
    assert!(calls
        .iter()
        .all(|call| !matches!(call, PanelCall::FindMany(_))));
}

#[tokio::test]
async fn differing_limit_is_updated_and_verified() {
    let panel = MockPanel::ready("5000");
    let outcome = run(&panel, &config(3000)).await;

    assert_eq!(outcome.status, Status::Success);
    assert_eq!(outcome.desired_limit, 3000);
    assert_eq!(outcome.current_limit.as_deref(), Some("5000"));
    assert_eq!(outcome.new_limit.as_deref(), Some("3000"));
    assert_eq!(outcome.message, "limit successfully updated");
    assert_eq!(panel.value_of(LIMIT_SELECTOR).as_deref(), Some("3000"));
}

#[tokio::test]
async fn update_clicks_the_third_confirm_button() {
    let panel = MockPanel::ready("5000");
    run(&panel, &config(3000)).await;

    let clicks: Vec<_> = panel
        .calls()
        .into_iter()
        .filter(|call| matches!(call, PanelCall::Click(_)))
        .collect();
    assert_eq!(clicks, vec![PanelCall::Click("button.OK[2]".into())]);
}

#[tokio::test]
async fn unverified_update_is_a_failure_not_an_error() {
    let panel = MockPanel::ready("5000").with_frozen(LIMIT_SELECTOR);
    let outcome = run(&panel, &config(3000)).await;

    assert_eq!(outcome.status, Status::Failure);
    assert_eq!(outcome.message, "failed to update the limit");
    assert!(outcome.new_limit.is_none());
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
async fn wrong_identity_is_reported_with_observed_value() {
    let panel = MockPanel::ready("5000").with_identity("string:admin");
    let outcome = run(&panel, &config(5000)).await;

    assert_eq!(outcome.status, Status::Error);
    assert!(outcome.message.contains("UnexpectedIdentity"));
    assert!(outcome.message.contains("string:admin"));
    assert!(!outcome.message.contains("hunter2"));
    assert_eq!(outcome.exit_code(), 1);
}

#[tokio::test]
async fn zero_confirm_buttons_reports_element_not_found() {
    let panel = MockPanel::ready("5000").with_confirm_buttons(0);
    let outcome = run(&panel, &config(3000)).await;

    assert_eq!(outcome.status, Status::Error);
    assert!(outcome.message.contains("ElementNotFound"));
    assert!(outcome.message.contains("OK button not found"));
}

#[tokio::test]
async fn short_confirm_button_row_is_not_indexed_past() {
    // Two buttons exist but not the committing third; same classification
    // as the empty case, and no click happens at all.
    let panel = MockPanel::ready("5000").with_confirm_buttons(2);
    let outcome = run(&panel, &config(3000)).await;

    assert_eq!(outcome.status, Status::Error);
    assert!(outcome.message.contains("OK button not found"));
    assert!(panel
        .calls()
        .iter()
        .all(|call| !matches!(call, PanelCall::Click(_))));
}

#[tokio::test]
async fn missing_password_field_reports_element_not_found() {
    let panel = MockPanel::ready("5000").with_missing("[type=password]");
    let outcome = run(&panel, &config(5000)).await;

    assert_eq!(outcome.status, Status::Error);
    assert!(outcome.message.contains("ElementNotFound"));
    assert!(outcome.message.contains("[type=password]"));
}

#[tokio::test]
async fn navigation_timeout_is_classified() {
    let panel = MockPanel::ready("5000").with_failing_navigation();
    let outcome = run(&panel, &config(5000)).await;

    assert_eq!(outcome.status, Status::Error);
    assert!(outcome.message.contains("NavigationTimeout"));
    assert!(outcome.current_limit.is_none());
}

#[tokio::test]
async fn debug_error_attaches_diagnostic_reference() {
    let panel = MockPanel::ready("5000").with_confirm_buttons(0);
    let sink = MemoryDiagnostics::default();
    let cfg = config(3000).debug(true);
    let outcome = LimitWorkflow::new(&cfg, &sink).run(&panel).await;

    assert_eq!(outcome.status, Status::Error);
    assert_eq!(outcome.diagnostic_reference.as_deref(), Some("screenshot#0"));
    assert_eq!(sink.stored(), 1);
}

#[tokio::test]
async fn error_without_debug_captures_nothing() {
    let panel = MockPanel::ready("5000").with_confirm_buttons(0);
    let sink = MemoryDiagnostics::default();
    let cfg = config(3000);
    let outcome = LimitWorkflow::new(&cfg, &sink).run(&panel).await;

    assert_eq!(outcome.status, Status::Error);
    assert!(outcome.diagnostic_reference.is_none());
    assert_eq!(sink.stored(), 0);
    assert!(panel
        .calls()
        .iter()
        .all(|call| !matches!(call, PanelCall::Screenshot)));
}

#[tokio::test]
async fn screenshot_failure_never_masks_the_primary_error() {
    let panel = MockPanel::ready("5000")
        .with_confirm_buttons(0)
        .with_failing_screenshot();
    let sink = MemoryDiagnostics::default();
    let cfg = config(3000).debug(true);
    let outcome = LimitWorkflow::new(&cfg, &sink).run(&panel).await;

    assert_eq!(outcome.status, Status::Error);
    assert!(outcome.message.contains("OK button not found"));
    assert!(outcome.diagnostic_reference.is_none());
}

#[tokio::test]
async fn sink_rejection_never_masks_the_primary_error() {
    let panel = MockPanel::ready("5000").with_confirm_buttons(0);
    let sink = MemoryDiagnostics::rejecting();
    let cfg = config(3000).debug(true);
    let outcome = LimitWorkflow::new(&cfg, &sink).run(&panel).await;

    assert_eq!(outcome.status, Status::Error);
    assert!(outcome.message.contains("OK button not found"));
    assert!(outcome.diagnostic_reference.is_none());
}

#[tokio::test]
async fn successful_runs_capture_no_diagnostics_even_in_debug() {
    let panel = MockPanel::ready("5000");
    let sink = MemoryDiagnostics::default();
    let cfg = config(3000).debug(true);
    let outcome = LimitWorkflow::new(&cfg, &sink).run(&panel).await;

    assert_eq!(outcome.status, Status::Success);
    assert_eq!(sink.stored(), 0);
}

#[tokio::test]
async fn clamped_limit_drives_the_comparison() {
    // Negative caller input clamps to zero before any interaction, so a
    // panel already at "0" is a skip.
    let panel = MockPanel::ready("0");
    let outcome = run(&panel, &config(-500)).await;

    assert_eq!(outcome.status, Status::Skipped);
    assert_eq!(outcome.desired_limit, 0);
}
