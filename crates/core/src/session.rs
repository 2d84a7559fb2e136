//! Driver session: one owned connection to the WebDriver endpoint.
//!
//! The session exposes the page surface the workflow needs through the
//! object-safe [`Panel`] / [`PanelElement`] traits, so the workflow can run
//! against a mock panel in tests. Element lookup re-expresses the driver's
//! implicit wait as an explicit bounded polling loop whose budget comes from
//! [`RunConfig::wait_budget`] rather than a hidden driver default.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder, Locator};
use tracing::{debug, warn};

use crate::config::RunConfig;
use crate::error::{DriverError, Result};

/// Poll interval for bounded element lookup.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Page operations the workflow runs against.
#[async_trait]
pub trait Panel: Send + Sync {
    /// Loads `url` in the controlled browser context, bounded by the
    /// session's wait budget.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Locates exactly one element matching the CSS `selector`, polling
    /// until the wait budget is exhausted.
    async fn find_one(&self, selector: &str) -> Result<Box<dyn PanelElement>>;

    /// Locates all elements matching `selector`. Polls until the match set
    /// is non-empty or the budget runs out, then returns whatever matched;
    /// zero matches is not an error here, the caller decides.
    async fn find_many(&self, selector: &str) -> Result<Vec<Box<dyn PanelElement>>>;

    /// Captures a viewport screenshot as PNG bytes. Best-effort: callers
    /// must never let a capture failure mask the error they are reporting.
    async fn screenshot(&self) -> Result<Vec<u8>>;
}

/// Primitive interactions on a located element.
#[async_trait]
pub trait PanelElement: Send + Sync {
    /// Reads the element's `value` property.
    async fn value(&self) -> Result<String>;

    /// Clears an input element.
    async fn clear(&self) -> Result<()>;

    /// Types `text` into the element.
    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Sends the Enter key to the element.
    async fn press_enter(&self) -> Result<()>;

    /// Clicks the element.
    async fn click(&self) -> Result<()>;
}

/// A live WebDriver session. Exactly one per workflow run; the workflow
/// borrows it as `&dyn Panel` and the caller closes it afterwards on every
/// path.
pub struct DriverSession {
    client: Client,
    wait_budget: Duration,
}

impl DriverSession {
    /// Connects to the WebDriver endpoint and starts a browser session with
    /// the configured rendering mode.
    pub async fn open(config: &RunConfig) -> Result<Self> {
        let mut firefox_args: Vec<&str> = Vec::new();
        if config.headless {
            firefox_args.push("-headless");
        }
        let mut caps = serde_json::Map::new();
        caps.insert(
            "moz:firefoxOptions".to_string(),
            serde_json::json!({ "args": firefox_args }),
        );

        debug!(target: "softlimit", url = %config.webdriver_url, headless = config.headless, "connecting to WebDriver endpoint");
        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .map_err(|e| DriverError::SessionStart(e.to_string()))?;

        Ok(Self {
            client,
            wait_budget: config.wait_budget,
        })
    }

    /// Ends the WebDriver session and releases the browser. Consumes the
    /// session so it cannot be closed twice or used afterwards.
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| DriverError::Unclassified(format!("session close failed: {e}")))
    }
}

#[async_trait]
impl Panel for DriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!(target: "softlimit", %url, "navigate");
        match tokio::time::timeout(self.wait_budget, self.client.goto(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(DriverError::Unclassified(format!(
                "navigation to {url} failed: {e}"
            ))),
            Err(_) => Err(DriverError::NavigationTimeout {
                url: url.to_string(),
                budget_secs: self.wait_budget.as_secs(),
            }),
        }
    }

    async fn find_one(&self, selector: &str) -> Result<Box<dyn PanelElement>> {
        let deadline = Instant::now() + self.wait_budget;
        loop {
            match self.client.find(Locator::Css(selector)).await {
                Ok(element) => return Ok(Box::new(DriverElement { inner: element })),
                Err(CmdError::NoSuchElement(_)) => {
                    if Instant::now() >= deadline {
                        return Err(DriverError::ElementNotFound(format!(
                            "no element matching `{selector}`"
                        )));
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
                Err(e) => {
                    return Err(DriverError::Unclassified(format!(
                        "lookup of `{selector}` failed: {e}"
                    )));
                }
            }
        }
    }

    async fn find_many(&self, selector: &str) -> Result<Vec<Box<dyn PanelElement>>> {
        let deadline = Instant::now() + self.wait_budget;
        loop {
            let elements = self
                .client
                .find_all(Locator::Css(selector))
                .await
                .map_err(|e| {
                    DriverError::Unclassified(format!("lookup of `{selector}` failed: {e}"))
                })?;
            if !elements.is_empty() || Instant::now() >= deadline {
                debug!(target: "softlimit", %selector, count = elements.len(), "find_many");
                return Ok(elements
                    .into_iter()
                    .map(|inner| Box::new(DriverElement { inner }) as Box<dyn PanelElement>)
                    .collect());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.client.screenshot().await.map_err(|e| {
            warn!(target: "softlimit", error = %e, "screenshot capture failed");
            DriverError::Unclassified(format!("screenshot capture failed: {e}"))
        })
    }
}

struct DriverElement {
    inner: Element,
}

impl DriverElement {
    fn interaction(e: CmdError) -> DriverError {
        DriverError::Interaction(e.to_string())
    }
}

#[async_trait]
impl PanelElement for DriverElement {
    async fn value(&self) -> Result<String> {
        self.inner
            .prop("value")
            .await
            .map(Option::unwrap_or_default)
            .map_err(Self::interaction)
    }

    async fn clear(&self) -> Result<()> {
        self.inner.clear().await.map_err(Self::interaction)
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.inner.send_keys(text).await.map_err(Self::interaction)
    }

    async fn press_enter(&self) -> Result<()> {
        self.inner
            .send_keys(&char::from(Key::Enter).to_string())
            .await
            .map_err(Self::interaction)
    }

    async fn click(&self) -> Result<()> {
        self.inner.click().await.map_err(Self::interaction)
    }
}
