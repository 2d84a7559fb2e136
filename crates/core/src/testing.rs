//! Test doubles for the workflow's driver seam.
//!
//! [`MockPanel`] implements [`Panel`] entirely in memory: element values live
//! in a shared map, every operation is appended to a call log, and builder
//! methods introduce the failure modes the workflow must classify (missing
//! elements, navigation timeouts, fields that reject writes, screenshot
//! capture failures). Tests assert on the resulting [`Outcome`] and on the
//! call log, e.g. that a skipped run never clears, types, or clicks.
//!
//! ```ignore
//! use softlimit::testing::{MemoryDiagnostics, MockPanel};
//!
//! let panel = MockPanel::ready("5000").with_confirm_buttons(0);
//! let sink = MemoryDiagnostics::default();
//! // run the workflow against &panel, then inspect panel.calls()
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{DriverError, Result};
use crate::session::{Panel, PanelElement};
use crate::workflow::DiagnosticSink;

/// One recorded panel or element operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCall {
    Goto(String),
    FindOne(String),
    FindMany(String),
    ReadValue(String),
    Clear(String),
    SendKeys { selector: String, text: String },
    PressEnter(String),
    Click(String),
    Screenshot,
}

#[derive(Default)]
struct PanelState {
    values: Mutex<HashMap<String, String>>,
    frozen: Mutex<HashSet<String>>,
    calls: Mutex<Vec<PanelCall>>,
}

impl PanelState {
    fn record(&self, call: PanelCall) {
        self.calls.lock().unwrap().push(call);
    }
}

/// In-memory panel mirroring the fixed page structure the workflow expects.
pub struct MockPanel {
    state: Arc<PanelState>,
    missing: HashSet<String>,
    confirm_buttons: usize,
    fail_navigation: bool,
    fail_screenshot: bool,
}

impl MockPanel {
    /// A panel logged out as the service account with the soft-limit field
    /// holding `current_limit` and the usual three confirmation buttons.
    pub fn ready(current_limit: &str) -> Self {
        let state = PanelState::default();
        {
            let mut values = state.values.lock().unwrap();
            values.insert("select".to_string(), "string:service".to_string());
            values.insert(
                r#"[input-validator="softLimitValidator"]"#.to_string(),
                current_limit.to_string(),
            );
        }
        Self {
            state: Arc::new(state),
            missing: HashSet::new(),
            confirm_buttons: 3,
            fail_navigation: false,
            fail_screenshot: false,
        }
    }

    /// Overrides the identity drop-down's value.
    pub fn with_identity(self, identity: &str) -> Self {
        self.state
            .values
            .lock()
            .unwrap()
            .insert("select".to_string(), identity.to_string());
        self
    }

    /// Number of `button.OK` elements the confirm lookup returns.
    pub fn with_confirm_buttons(mut self, count: usize) -> Self {
        self.confirm_buttons = count;
        self
    }

    /// Makes `find_one` fail for `selector` as if the wait budget expired.
    pub fn with_missing(mut self, selector: &str) -> Self {
        self.missing.insert(selector.to_string());
        self
    }

    /// Makes writes to `selector` silently not stick, as a panel rejecting
    /// input does.
    pub fn with_frozen(self, selector: &str) -> Self {
        self.state
            .frozen
            .lock()
            .unwrap()
            .insert(selector.to_string());
        self
    }

    /// Makes navigation time out.
    pub fn with_failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    /// Makes screenshot capture fail.
    pub fn with_failing_screenshot(mut self) -> Self {
        self.fail_screenshot = true;
        self
    }

    /// Snapshot of every operation performed so far, in order.
    pub fn calls(&self) -> Vec<PanelCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Current value of an element, as the panel would report it.
    pub fn value_of(&self, selector: &str) -> Option<String> {
        self.state.values.lock().unwrap().get(selector).cloned()
    }

    fn element(&self, selector: &str, label: String) -> Box<dyn PanelElement> {
        Box::new(MockElement {
            selector: selector.to_string(),
            label,
            state: Arc::clone(&self.state),
        })
    }
}

#[async_trait]
impl Panel for MockPanel {
    async fn goto(&self, url: &str) -> Result<()> {
        self.state.record(PanelCall::Goto(url.to_string()));
        if self.fail_navigation {
            return Err(DriverError::NavigationTimeout {
                url: url.to_string(),
                budget_secs: 10,
            });
        }
        Ok(())
    }

    async fn find_one(&self, selector: &str) -> Result<Box<dyn PanelElement>> {
        self.state.record(PanelCall::FindOne(selector.to_string()));
        if self.missing.contains(selector) {
            return Err(DriverError::ElementNotFound(format!(
                "no element matching `{selector}`"
            )));
        }
        Ok(self.element(selector, selector.to_string()))
    }

    async fn find_many(&self, selector: &str) -> Result<Vec<Box<dyn PanelElement>>> {
        self.state.record(PanelCall::FindMany(selector.to_string()));
        Ok((0..self.confirm_buttons)
            .map(|i| self.element(selector, format!("{selector}[{i}]")))
            .collect())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.state.record(PanelCall::Screenshot);
        if self.fail_screenshot {
            return Err(DriverError::Unclassified(
                "screenshot capture failed: no surface".to_string(),
            ));
        }
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

struct MockElement {
    selector: String,
    label: String,
    state: Arc<PanelState>,
}

impl MockElement {
    fn writes_stick(&self) -> bool {
        !self.state.frozen.lock().unwrap().contains(&self.selector)
    }
}

#[async_trait]
impl PanelElement for MockElement {
    async fn value(&self) -> Result<String> {
        self.state.record(PanelCall::ReadValue(self.selector.clone()));
        Ok(self
            .state
            .values
            .lock()
            .unwrap()
            .get(&self.selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn clear(&self) -> Result<()> {
        self.state.record(PanelCall::Clear(self.selector.clone()));
        if self.writes_stick() {
            self.state
                .values
                .lock()
                .unwrap()
                .insert(self.selector.clone(), String::new());
        }
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.state.record(PanelCall::SendKeys {
            selector: self.selector.clone(),
            text: text.to_string(),
        });
        if self.writes_stick() {
            let mut values = self.state.values.lock().unwrap();
            values.entry(self.selector.clone()).or_default().push_str(text);
        }
        Ok(())
    }

    async fn press_enter(&self) -> Result<()> {
        self.state
            .record(PanelCall::PressEnter(self.selector.clone()));
        Ok(())
    }

    async fn click(&self) -> Result<()> {
        self.state.record(PanelCall::Click(self.label.clone()));
        Ok(())
    }
}

/// In-memory diagnostic sink; stores captured screenshots and hands back
/// stable references.
#[derive(Default)]
pub struct MemoryDiagnostics {
    rejecting: bool,
    screenshots: Mutex<Vec<Vec<u8>>>,
}

impl MemoryDiagnostics {
    /// A sink that drops every capture, as a full disk would.
    pub fn rejecting() -> Self {
        Self {
            rejecting: true,
            screenshots: Mutex::new(Vec::new()),
        }
    }

    pub fn stored(&self) -> usize {
        self.screenshots.lock().unwrap().len()
    }
}

impl DiagnosticSink for MemoryDiagnostics {
    fn store_screenshot(&self, png: &[u8]) -> Option<String> {
        if self.rejecting {
            return None;
        }
        let mut screenshots = self.screenshots.lock().unwrap();
        screenshots.push(png.to_vec());
        Some(format!("screenshot#{}", screenshots.len() - 1))
    }
}
