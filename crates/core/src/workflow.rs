//! The limit-setting workflow: one pass over the inverter's settings page.
//!
//! The run is a straight line from navigation through authentication to the
//! verified update, and every fault along it is intercepted here and
//! reported as a terminal `error` outcome.
//! Nothing is retried; a caller that wants retry semantics re-invokes the
//! whole process.

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{DriverError, Result};
use crate::outcome::Outcome;
use crate::session::Panel;

/// Hash-route of the grid-operator settings page within the panel UI.
const SETTINGS_PATH: &str = "/#/settings/evu";

/// Value the identity drop-down must hold before we type the password.
const SERVICE_IDENTITY: &str = "string:service";

/// The settings dialog renders several buttons with class `OK`; on current
/// firmware the element at this index is the one that commits the change.
/// Fixed upstream contract, pinned by tests rather than derived.
pub const CONFIRM_BUTTON_INDEX: usize = 2;

mod selectors {
    /// The sole account drop-down on the login pane.
    pub const IDENTITY_DROPDOWN: &str = "select";
    pub const PASSWORD_INPUT: &str = "[type=password]";
    /// The soft-limit field is tagged by its validator attribute rather
    /// than an id, which survives page-position changes.
    pub const SOFT_LIMIT_INPUT: &str = r#"[input-validator="softLimitValidator"]"#;
    pub const CONFIRM_BUTTONS: &str = "button.OK";
}

/// Sink for failure diagnostics, scoped to one run.
///
/// The workflow decides *when* a screenshot should be persisted; the sink
/// owns naming, location, and rotation. The returned string is an opaque
/// reference surfaced as `diagnostic_reference` on the outcome.
pub trait DiagnosticSink: Send + Sync {
    /// Persists a failure screenshot, best-effort. `None` means the capture
    /// was dropped; the caller reports its primary error unchanged.
    fn store_screenshot(&self, png: &[u8]) -> Option<String>;
}

/// The browser-driven interaction state machine.
pub struct LimitWorkflow<'a> {
    config: &'a RunConfig,
    diagnostics: &'a dyn DiagnosticSink,
}

impl<'a> LimitWorkflow<'a> {
    pub fn new(config: &'a RunConfig, diagnostics: &'a dyn DiagnosticSink) -> Self {
        Self {
            config,
            diagnostics,
        }
    }

    /// Runs the workflow to completion against a borrowed panel session.
    ///
    /// Always returns an [`Outcome`]; any [`DriverError`] raised along the
    /// way is converted into a terminal `error` outcome here, with a
    /// screenshot captured at the failure point when debug diagnostics are
    /// enabled.
    pub async fn run(&self, panel: &dyn Panel) -> Outcome {
        let mut observed_limit = None;
        match self.execute(panel, &mut observed_limit).await {
            Ok(outcome) => {
                info!(target: "softlimit", status = ?outcome.status, "workflow finished");
                outcome
            }
            Err(err) => {
                warn!(target: "softlimit", kind = %err.kind(), error = %err, "workflow failed");
                let reference = self.capture_failure(panel).await;
                Outcome::error(self.config.desired_limit, observed_limit, &err, reference)
            }
        }
    }

    async fn execute(
        &self,
        panel: &dyn Panel,
        observed_limit: &mut Option<String>,
    ) -> Result<Outcome> {
        let url = format!(
            "{}{}",
            self.config.target_url.trim_end_matches('/'),
            SETTINGS_PATH
        );
        info!(target: "softlimit", %url, desired_limit = self.config.desired_limit, "starting limit update");
        panel.goto(&url).await?;

        // The login pane preselects an account in its only drop-down. Anything
        // other than the service account means we are about to type the
        // password into the wrong context, so bail before authenticating.
        let identity = panel.find_one(selectors::IDENTITY_DROPDOWN).await?.value().await?;
        if identity != SERVICE_IDENTITY {
            return Err(DriverError::UnexpectedIdentity {
                observed: identity,
                expected: SERVICE_IDENTITY,
            });
        }

        let password_input = panel.find_one(selectors::PASSWORD_INPUT).await?;
        password_input.send_keys(&self.config.service_password).await?;
        password_input.press_enter().await?;
        debug!(target: "softlimit", "authenticated as service account");

        let limit_field = panel.find_one(selectors::SOFT_LIMIT_INPUT).await?;
        let current_limit = limit_field.value().await?;
        *observed_limit = Some(current_limit.clone());

        let desired = self.config.desired_limit.to_string();
        if current_limit == desired {
            // Avoids an unnecessary write to the inverter firmware settings.
            info!(target: "softlimit", %current_limit, "limit already matches, skipping update");
            return Ok(Outcome::skipped(self.config.desired_limit, current_limit));
        }

        info!(target: "softlimit", %current_limit, new_limit = %desired, "updating limit");
        limit_field.clear().await?;
        limit_field.send_keys(&desired).await?;

        let confirm_buttons = panel.find_many(selectors::CONFIRM_BUTTONS).await?;
        let confirm = confirm_buttons
            .get(CONFIRM_BUTTON_INDEX)
            .ok_or_else(|| DriverError::ElementNotFound("OK button not found".to_string()))?;
        confirm.click().await?;

        let verified = limit_field.value().await?;
        if verified == desired {
            Ok(Outcome::success(
                self.config.desired_limit,
                current_limit,
                verified,
            ))
        } else {
            warn!(target: "softlimit", expected = %desired, observed = %verified, "limit did not stick");
            Ok(Outcome::failure(self.config.desired_limit, current_limit))
        }
    }

    /// Best-effort screenshot at the moment of failure. Only runs with debug
    /// diagnostics enabled; capture or persistence failures are logged and
    /// swallowed so the primary error stays the one reported.
    async fn capture_failure(&self, panel: &dyn Panel) -> Option<String> {
        if !self.config.debug {
            return None;
        }
        match panel.screenshot().await {
            Ok(png) => self.diagnostics.store_screenshot(&png),
            Err(err) => {
                warn!(target: "softlimit", error = %err, "failure screenshot unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Status;
    use crate::testing::{MemoryDiagnostics, MockPanel, PanelCall};

    fn config(desired: i64) -> RunConfig {
        RunConfig::new("http://inverter.local", "hunter2", desired)
    }

    #[tokio::test]
    async fn navigates_to_settings_route() {
        let panel = MockPanel::ready("5000");
        let sink = MemoryDiagnostics::default();
        let cfg = config(5000);
        LimitWorkflow::new(&cfg, &sink).run(&panel).await;
        assert_eq!(
            panel.calls()[0],
            PanelCall::Goto("http://inverter.local/#/settings/evu".into())
        );
    }

    #[tokio::test]
    async fn trailing_slash_in_target_url_is_tolerated() {
        let panel = MockPanel::ready("5000");
        let sink = MemoryDiagnostics::default();
        let cfg = RunConfig::new("http://inverter.local/", "hunter2", 5000);
        LimitWorkflow::new(&cfg, &sink).run(&panel).await;
        assert_eq!(
            panel.calls()[0],
            PanelCall::Goto("http://inverter.local/#/settings/evu".into())
        );
    }

    #[tokio::test]
    async fn identity_is_checked_before_password_entry() {
        let panel = MockPanel::ready("5000").with_identity("string:admin");
        let sink = MemoryDiagnostics::default();
        let cfg = config(5000);
        let outcome = LimitWorkflow::new(&cfg, &sink).run(&panel).await;

        assert_eq!(outcome.status, Status::Error);
        // The password was never typed anywhere.
        assert!(panel
            .calls()
            .iter()
            .all(|call| !matches!(call, PanelCall::SendKeys { .. })));
    }

    #[tokio::test]
    async fn error_outcome_keeps_observed_limit_when_read_before_fault() {
        // Fault after the limit read: no confirm buttons at all.
        let panel = MockPanel::ready("5000").with_confirm_buttons(0);
        let sink = MemoryDiagnostics::default();
        let cfg = config(3000);
        let outcome = LimitWorkflow::new(&cfg, &sink).run(&panel).await;

        assert_eq!(outcome.status, Status::Error);
        assert_eq!(outcome.current_limit.as_deref(), Some("5000"));
    }
}
