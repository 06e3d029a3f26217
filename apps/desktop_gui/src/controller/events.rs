//! UI/backend events and error modeling for the desktop controller.

use client_core::ClientError;
use shared::protocol::ContactRecord;

#[derive(Debug)]
pub enum UiEvent {
    /// Full replacement list from a successful fetch.
    ContactsLoaded(Vec<ContactRecord>),
    /// A create, update, or delete finished; the orchestrator does not need
    /// to know which one.
    MutationDone,
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FetchContacts,
    SaveContact,
    DeleteContact,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport { .. } => UiErrorCategory::Transport,
            ClientError::Status { status, .. } if *status == 400 => UiErrorCategory::Validation,
            ClientError::Status { .. } => UiErrorCategory::Backend,
            ClientError::MalformedResponse(_) => UiErrorCategory::Backend,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Unknown,
            context,
            message: message.into(),
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
