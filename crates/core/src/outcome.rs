//! The single structured record a workflow run produces.

use serde::{Deserialize, Serialize};

use crate::error::DriverError;

/// Terminal status of a run.
///
/// `skipped`, `success`, and `failure` are expected results; `error` means
/// something broke mid-run. Only `error` maps to a non-zero exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Skipped,
    Success,
    Failure,
    Error,
}

/// Result record for one workflow run.
///
/// Constructed exactly once through the constructors below; the status is
/// terminal and no field changes after construction. `new_limit` is only
/// ever present on `success`, `diagnostic_reference` only on `error` runs
/// that captured a screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub desired_limit: u64,
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_reference: Option<String>,
}

impl Outcome {
    /// The configured limit already matched; nothing was written.
    pub fn skipped(desired_limit: u64, current_limit: String) -> Self {
        Self {
            desired_limit,
            status: Status::Skipped,
            message: "current limit matches desired limit".to_string(),
            current_limit: Some(current_limit),
            new_limit: None,
            diagnostic_reference: None,
        }
    }

    /// The update was written and the re-read value confirmed it.
    pub fn success(desired_limit: u64, current_limit: String, new_limit: String) -> Self {
        Self {
            desired_limit,
            status: Status::Success,
            message: "limit successfully updated".to_string(),
            current_limit: Some(current_limit),
            new_limit: Some(new_limit),
            diagnostic_reference: None,
        }
    }

    /// The update was written but the re-read value did not confirm it.
    pub fn failure(desired_limit: u64, current_limit: String) -> Self {
        Self {
            desired_limit,
            status: Status::Failure,
            message: "failed to update the limit".to_string(),
            current_limit: Some(current_limit),
            new_limit: None,
            diagnostic_reference: None,
        }
    }

    /// A fault was intercepted at the workflow boundary. The message leads
    /// with the failure kind so the class is greppable in reported output.
    pub fn error(
        desired_limit: u64,
        current_limit: Option<String>,
        err: &DriverError,
        diagnostic_reference: Option<String>,
    ) -> Self {
        Self {
            desired_limit,
            status: Status::Error,
            message: format!("{}: {}", err.kind(), err),
            current_limit,
            new_limit: None,
            diagnostic_reference,
        }
    }

    /// Documented process exit code: zero for any terminal status except
    /// `error`.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            Status::Error => 1,
            _ => 0,
        }
    }
}
