use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("store call failed: {0}")]
    Transport(String),
}

impl PortalError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Wire code used in the IPC error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation { .. } => "validation_failed",
            Self::Transport(_) => "transport_failed",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::NotFound { kind, id } => Some(json!({ "kind": kind, "id": id })),
            Self::Validation { field, .. } => Some(json!({ "field": field })),
            Self::Transport(_) => None,
        }
    }
}

impl From<rusqlite::Error> for PortalError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Rejects blank required text fields.
pub fn require_text(field: &'static str, value: &str) -> Result<(), PortalError> {
    if value.trim().is_empty() {
        return Err(PortalError::validation(field, "must not be empty"));
    }
    Ok(())
}
