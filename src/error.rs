// Error taxonomy shared by the credential store, the panel client and the
// server selector. Every variant renders as the single message shown to the
// operator, so command handlers can print `err.to_string()` directly.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while talking to the panel.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("You are not logged in.")]
    NotLoggedIn,

    /// HTTP 401.
    #[error("Invalid API key.")]
    InvalidCredential,

    /// HTTP 403.
    #[error("You do not have permission to access this resource.")]
    InsufficientPermission,

    /// HTTP 404. Carries the resolved URL for diagnostics.
    #[error("Resource not found: {path}")]
    ResourceNotFound { path: String },

    /// HTTP 429.
    #[error("You are being rate limited by the panel, try again later.")]
    RateLimited,

    /// Any 5xx status.
    #[error("The panel is unavailable right now (HTTP {status}), try again later.")]
    PanelUnavailable { status: u16 },

    /// Any other non-success status.
    #[error("The panel returned an unexpected status (HTTP {status}).")]
    UnexpectedStatus { status: u16 },

    /// DNS, connect or timeout failure before a status was received.
    #[error("Could not reach the panel: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("The panel returned a malformed {context} response: {reason}")]
    MalformedResponse { context: &'static str, reason: String },

    #[error("Selection cancelled.")]
    SelectionCancelled,

    #[error("Could not access credential file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(#[source] io::Error),
}

impl PanelError {
    /// Operator interrupted an interactive prompt. The binary ends the
    /// process with a non-zero status for this case only.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PanelError::SelectionCancelled)
    }

    pub(crate) fn malformed(context: &'static str, err: impl std::fmt::Display) -> Self {
        PanelError::MalformedResponse {
            context,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_operator_facing() {
        assert_eq!(PanelError::NotLoggedIn.to_string(), "You are not logged in.");
        assert_eq!(PanelError::InvalidCredential.to_string(), "Invalid API key.");
        let err = PanelError::ResourceNotFound {
            path: "https://panel.example/api/client/servers/abc".into(),
        };
        assert!(err.to_string().contains("/servers/abc"));
        let err = PanelError::PanelUnavailable { status: 503 };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn only_selection_cancel_is_a_cancellation() {
        assert!(PanelError::SelectionCancelled.is_cancellation());
        assert!(!PanelError::NotLoggedIn.is_cancellation());
        assert!(!PanelError::RateLimited.is_cancellation());
        let io_err = io::Error::new(io::ErrorKind::Interrupted, "read interrupted");
        assert!(!PanelError::Prompt(io_err).is_cancellation());
    }

    #[test]
    fn config_io_keeps_source() {
        use std::error::Error as _;
        let err = PanelError::ConfigIo {
            path: PathBuf::from("/nope/config.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/config.json"));
        assert!(err.source().is_some());
    }
}
