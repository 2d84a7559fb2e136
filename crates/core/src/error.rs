use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DriverError>;

/// Failure taxonomy for the driver session and workflow.
///
/// Every variant is intercepted at the workflow boundary and reported as a
/// terminal `error` outcome; none of them cross [`crate::LimitWorkflow::run`]
/// as a raw fault. A verified update that did not stick is not an error;
/// it is the distinct `failure` outcome status.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The automation endpoint could not be reached or rejected the session.
    #[error("could not start driver session: {0}")]
    SessionStart(String),

    /// The target page did not load within the wait budget.
    #[error("navigation to {url} did not settle within {budget_secs}s")]
    NavigationTimeout { url: String, budget_secs: u64 },

    /// An expected control is missing from the page.
    #[error("{0}")]
    ElementNotFound(String),

    /// The identity drop-down held something other than the service account
    /// marker. Carries the observed value for diagnosis; credentials never
    /// appear here or in any other message.
    #[error("logged-in identity is {observed:?}, expected {expected:?}")]
    UnexpectedIdentity { observed: String, expected: &'static str },

    /// A located element could no longer be read, written, or clicked.
    #[error("element interaction failed: {0}")]
    Interaction(String),

    /// Any other runtime fault.
    #[error("{0}")]
    Unclassified(String),
}

impl DriverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DriverError::SessionStart(_) => ErrorKind::SessionStartError,
            DriverError::NavigationTimeout { .. } => ErrorKind::NavigationTimeout,
            DriverError::ElementNotFound(_) => ErrorKind::ElementNotFound,
            DriverError::UnexpectedIdentity { .. } => ErrorKind::UnexpectedIdentity,
            DriverError::Interaction(_) => ErrorKind::InteractionError,
            DriverError::Unclassified(_) => ErrorKind::Unclassified,
        }
    }
}

/// Displayable failure class, prefixed onto error-outcome messages so the
/// class survives serialization without a dedicated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SessionStartError,
    NavigationTimeout,
    ElementNotFound,
    UnexpectedIdentity,
    InteractionError,
    Unclassified,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SessionStartError => "SessionStartError",
            ErrorKind::NavigationTimeout => "NavigationTimeout",
            ErrorKind::ElementNotFound => "ElementNotFound",
            ErrorKind::UnexpectedIdentity => "UnexpectedIdentity",
            ErrorKind::InteractionError => "InteractionError",
            ErrorKind::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let err = DriverError::ElementNotFound("no element matching `select`".into());
        assert_eq!(err.kind(), ErrorKind::ElementNotFound);

        let err = DriverError::UnexpectedIdentity {
            observed: "string:admin".into(),
            expected: "string:service",
        };
        assert_eq!(err.kind(), ErrorKind::UnexpectedIdentity);
    }

    #[test]
    fn identity_error_reports_observed_value() {
        let err = DriverError::UnexpectedIdentity {
            observed: "string:admin".into(),
            expected: "string:service",
        };
        let message = err.to_string();
        assert!(message.contains("string:admin"));
        assert!(message.contains("string:service"));
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(ErrorKind::SessionStartError.to_string(), "SessionStartError");
        assert_eq!(ErrorKind::NavigationTimeout.to_string(), "NavigationTimeout");
        assert_eq!(ErrorKind::InteractionError.to_string(), "InteractionError");
    }
}
