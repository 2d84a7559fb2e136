//! softlimit: drive an inverter's embedded web panel to set its export soft limit.
//!
//! The crate has two halves. [`DriverSession`] owns a single connection to a
//! WebDriver endpoint and exposes the handful of page operations the tool
//! needs (navigate, bounded element lookup, keystrokes, clicks, screenshots).
//! [`LimitWorkflow`] borrows that session through the [`Panel`] trait and runs
//! the one administrative task: authenticate as the service account, read the
//! configured soft limit, and update and verify it when it differs from the
//! desired value.
//!
//! Every run produces exactly one [`Outcome`]. Expected results such as the
//! limit already matching (`skipped`) or an update that did not stick
//! (`failure`) are plain statuses, not errors. Faults of any kind
//! are intercepted at the workflow boundary and reported as a terminal
//! `error` outcome; nothing propagates past [`LimitWorkflow::run`].
//!
//! ```ignore
//! use softlimit::{DriverSession, LimitWorkflow, RunConfig};
//!
//! # async fn run(sink: &dyn softlimit::DiagnosticSink) -> anyhow::Result<()> {
//! let config = RunConfig::new("http://192.168.2.100", "secret", 5000);
//! let session = DriverSession::open(&config).await?;
//! let outcome = LimitWorkflow::new(&config, sink).run(&session).await;
//! session.close().await?;
//! println!("{}", serde_json::to_string(&outcome)?);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod outcome;
mod session;
mod workflow;

pub mod testing;

pub use config::{RunConfig, DEFAULT_WAIT_BUDGET, DEFAULT_WEBDRIVER_URL};
pub use error::{DriverError, ErrorKind, Result};
pub use outcome::{Outcome, Status};
pub use session::{DriverSession, Panel, PanelElement};
pub use workflow::{DiagnosticSink, LimitWorkflow, CONFIRM_BUTTON_INDEX};
