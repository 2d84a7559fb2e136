use std::fmt;
use std::time::Duration;

/// Default WebDriver endpoint (geckodriver's standard listen address).
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Default bound on element lookup and page-load waits.
pub const DEFAULT_WAIT_BUDGET: Duration = Duration::from_secs(10);

/// Immutable per-run configuration, constructed once from caller input.
#[derive(Clone)]
pub struct RunConfig {
    /// Base address of the inverter's web UI, e.g. `http://192.168.2.100`.
    pub target_url: String,
    /// Password for the fixed "service" account. Redacted from `Debug`
    /// output and never included in log lines or outcome messages.
    pub service_password: String,
    /// Desired export soft limit. Negative caller input clamps to zero.
    pub desired_limit: u64,
    /// Run the controlled browser without an on-screen surface.
    pub headless: bool,
    /// Verbose diagnostics plus screenshot capture on error.
    pub debug: bool,
    /// Address of the WebDriver endpoint the session connects to.
    pub webdriver_url: String,
    /// Bound on element lookup and navigation waits.
    pub wait_budget: Duration,
}

impl RunConfig {
    pub fn new(target_url: impl Into<String>, service_password: impl Into<String>, desired_limit: i64) -> Self {
        Self {
            target_url: target_url.into(),
            service_password: service_password.into(),
            desired_limit: desired_limit.max(0) as u64,
            headless: true,
            debug: false,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            wait_budget: DEFAULT_WAIT_BUDGET,
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    pub fn wait_budget(mut self, budget: Duration) -> Self {
        self.wait_budget = budget;
        self
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("target_url", &self.target_url)
            .field("service_password", &"<redacted>")
            .field("desired_limit", &self.desired_limit)
            .field("headless", &self.headless)
            .field("debug", &self.debug)
            .field("webdriver_url", &self.webdriver_url)
            .field("wait_budget", &self.wait_budget)
            .finish()
    }
}
