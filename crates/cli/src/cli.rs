use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use softlimit::RunConfig;

#[derive(Parser, Debug)]
#[command(name = "softlimit")]
#[command(about = "Set an inverter's grid-export soft limit through its web configuration panel")]
#[command(version)]
pub struct Cli {
    /// Base URL of the inverter's web UI, e.g. http://192.168.2.100
    #[arg(short, long, value_name = "URL")]
    pub url: String,

    /// Password for the inverter's service account
    #[arg(short, long, value_name = "PASSWORD")]
    pub password: String,

    /// Desired export limit as an integer; negative values clamp to 0
    #[arg(short, long, value_name = "WATTS", allow_hyphen_values = true)]
    pub limit: i64,

    /// Render the browser on-screen instead of headless
    #[arg(long)]
    pub headed: bool,

    /// Debug mode: verbose logging, screenshot capture on error, pretty JSON
    #[arg(short, long)]
    pub debug: bool,

    /// WebDriver endpoint the driver session connects to
    #[arg(long, value_name = "URL", default_value = softlimit::DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Bound on element lookup and page-load waits, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub wait_secs: u64,

    /// Directory failure screenshots are written to
    #[arg(long, value_name = "DIR", default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(&self.url, &self.password, self.limit)
            .headless(!self.headed)
            .debug(self.debug)
            .webdriver_url(&self.webdriver_url)
            .wait_budget(Duration::from_secs(self.wait_secs))
    }
}
