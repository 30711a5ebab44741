//! UI/backend events and error modeling for the customer window.

use std::path::PathBuf;

use client_core::ViewState;
use tokio::sync::oneshot;

pub enum UiEvent {
    Info(String),
    ViewUpdated(ViewState),
    ConfirmRequested {
        message: String,
        reply: oneshot::Sender<bool>,
    },
    Alert(String),
    Exported {
        rows: usize,
        path: PathBuf,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Export,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Sync,
    Export,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if context == UiErrorContext::Export
            || message_lower.contains("csv")
            || message_lower.contains("grid has not signaled")
        {
            UiErrorCategory::Export
        } else if message_lower.contains("invalid")
            || message_lower.contains("malformed")
            || message_lower.contains("no self link")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("dns")
            || message_lower.contains("failed")
            || message_lower.contains("status")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status-bar text. Sync failures are logged only and leave the status bar as is.
    pub fn status_line(&self) -> Option<String> {
        match self.context {
            UiErrorContext::Sync => None,
            UiErrorContext::BackendStartup => {
                Some(format!("Backend failed to start: {}", self.message))
            }
            UiErrorContext::Export => Some(format!("Export failed: {}", self.message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_transport_failures() {
        let err = UiError::from_message(
            UiErrorContext::Sync,
            "GET http://127.0.0.1:1/api/customers failed: error sending request: connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.status_line(), None);
    }

    #[test]
    fn failed_list_status_is_not_shown() {
        let err = UiError::from_message(
            UiErrorContext::Sync,
            "GET http://127.0.0.1:1/api/customers returned status 503",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.status_line(), None);
    }

    #[test]
    fn backend_startup_failures_are_shown() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "invalid resource url 'not a url': relative URL without a base",
        );
        assert_eq!(
            err.status_line().as_deref(),
            Some("Backend failed to start: invalid resource url 'not a url': relative URL without a base")
        );
    }

    #[test]
    fn classifies_decode_failures_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::Sync,
            "malformed response from http://x/api/customers: expected value",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
    }

    #[test]
    fn export_context_wins() {
        let err = UiError::from_message(UiErrorContext::Export, "permission denied");
        assert_eq!(err.category(), UiErrorCategory::Export);
        assert_eq!(err.context(), UiErrorContext::Export);
        assert_eq!(
            err.status_line().as_deref(),
            Some("Export failed: permission denied")
        );
    }
}
