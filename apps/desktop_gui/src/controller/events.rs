//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{AskResult, ClientError, FetchResult};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    AskCompleted(AskResult),
    DocumentFetched(FetchResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Timeout,
    NotFound,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Health,
    Dispatch,
}

impl UiErrorContext {
    pub fn label(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "startup",
            UiErrorContext::Health => "health check",
            UiErrorContext::Dispatch => "command queue",
        }
    }
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
        let category = if message_lower.contains("timed out") || message_lower.contains("timeout") {
            UiErrorCategory::Timeout
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("disconnected")
            || message_lower.contains("unavailable")
            || message_lower.contains("queue")
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

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            _ if err.is_timeout() => UiErrorCategory::Timeout,
            ClientError::Status { status, .. } if status.as_u16() == 404 => {
                UiErrorCategory::NotFound
            }
            ClientError::Decode { .. } => UiErrorCategory::Validation,
            ClientError::Transport { .. } | ClientError::Unavailable(_) => {
                UiErrorCategory::Transport
            }
            ClientError::Status { .. } | ClientError::Build(_) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
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
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Timeout => "Timeout",
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_worker_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::Dispatch,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::Dispatch);
    }

    #[test]
    fn classifies_unavailable_client_error_as_transport() {
        let err = UiError::from_client_error(
            UiErrorContext::Health,
            &ClientError::Unavailable("worker gone".to_string()),
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(err.message().contains("worker gone"));
    }
}
