//! Operator-facing notices and the confirmation gate for destructive actions.

use serde::{Deserialize, Serialize};

/// Shown whenever a request failed below the envelope level.
pub const TRY_AGAIN_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Notification {
            severity,
            message: message.into(),
        }
    }
}

/// What a finished action asks of its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub notification: Notification,
    /// The dialog (form or import) that issued the action should close.
    pub close_dialog: bool,
    /// The listing must be reloaded from the backend.
    pub refresh_listing: bool,
}

impl ActionOutcome {
    /// Mutation went through: close and reload.
    pub fn completed(notification: Notification) -> Self {
        ActionOutcome {
            notification,
            close_dialog: true,
            refresh_listing: true,
        }
    }

    /// Nothing changed on the backend: stay open, don't reload.
    pub fn retained(notification: Notification) -> Self {
        ActionOutcome {
            notification,
            close_dialog: false,
            refresh_listing: false,
        }
    }
}

/// A pending destructive action awaiting an explicit yes or no.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation<T> {
    subject: Option<T>,
    prompt: String,
}

impl<T> Confirmation<T> {
    pub fn new(subject: T, prompt: impl Into<String>) -> Self {
        Confirmation {
            subject: Some(subject),
            prompt: prompt.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn subject(&self) -> Option<&T> {
        self.subject.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.subject.is_some()
    }

    /// Hands the subject over exactly once.
    pub fn confirm(&mut self) -> Option<T> {
        self.subject.take()
    }

    pub fn cancel(&mut self) {
        self.subject = None;
    }
}
