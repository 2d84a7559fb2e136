//! File-backed diagnostic sink.
//!
//! When the workflow fails with diagnostics enabled it hands this sink the
//! failure screenshot; the sink owns where and how the bytes land. Files are
//! timestamped PNGs under the artifacts directory, and the returned path is
//! the opaque reference reported in the outcome. Persistence failures are
//! logged and dropped so the workflow's primary error stays the one
//! reported.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use softlimit::DiagnosticSink;
use tracing::{debug, warn};

pub struct FileDiagnostics {
    dir: PathBuf,
}

impl FileDiagnostics {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn persist(&self, png: &[u8]) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let path = self.dir.join(format!("limit-{timestamp}-failure.png"));
        std::fs::write(&path, png)?;
        Ok(path)
    }
}

impl DiagnosticSink for FileDiagnostics {
    fn store_screenshot(&self, png: &[u8]) -> Option<String> {
        match self.persist(png) {
            Ok(path) => {
                debug!(target: "softlimit", path = %path.display(), "failure screenshot saved");
                Some(path.display().to_string())
            }
            Err(err) => {
                warn!(target: "softlimit", error = %err, "failed to persist failure screenshot");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_screenshot_and_returns_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileDiagnostics::new(dir.path().join("artifacts"));

        let reference = sink.store_screenshot(b"\x89PNG").expect("reference");
        assert!(reference.ends_with("-failure.png"));
        assert_eq!(std::fs::read(&reference).unwrap(), b"\x89PNG");
    }

    #[test]
    fn unwritable_directory_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the directory should be makes create_dir_all fail.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"file").unwrap();
        let sink = FileDiagnostics::new(&blocked);

        assert!(sink.store_screenshot(b"\x89PNG").is_none());
    }
}
