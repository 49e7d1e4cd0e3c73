//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HubError`]
//! via `#[from]` (or an explicit `From` impl for adapter errors).

/// Top-level error shared by every port and service.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("remote call failed")]
    Remote(#[from] RemoteError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant or input-schema violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("entity_id must not be empty")]
    EmptyEntityId,

    #[error("integration must not be empty")]
    EmptyIntegration,

    #[error("unique_id must not be empty")]
    EmptyUniqueId,

    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("unexpected field `{0}`")]
    UnexpectedField(String),

    #[error("field `{field}` expected {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` has invalid value `{value}`")]
    InvalidValue { field: &'static str, value: String },

    #[error("unsupported service `{0}`")]
    UnsupportedService(String),
}

/// A lookup that came back empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failure reported by an external client (vendor cloud, music server, …).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{service}: {message}")]
pub struct RemoteError {
    /// Which remote collaborator failed (e.g. `"lock cloud"`).
    pub service: &'static str,
    pub message: String,
}

impl RemoteError {
    #[must_use]
    pub fn new(service: &'static str, message: impl Into<String>) -> Self {
        Self {
            service,
            message: message.into(),
        }
    }
}
