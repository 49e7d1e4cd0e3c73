//! Lock adapter error types.

use hearth_domain::error::{HubError, RemoteError};

/// Errors specific to the lock integration.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// The first refresh during setup did not produce data.
    #[error("initial refresh failed: {0}")]
    InitialRefresh(String),

    /// `handle_service_call` was used before `setup`.
    #[error("lock integration is not set up")]
    NotSetUp,

    /// A domain-level error (validation, not-found, remote, …).
    #[error("domain error")]
    Domain(#[source] HubError),
}

impl LockError {
    /// Convert into a [`HubError`] for propagation across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> HubError {
        match self {
            Self::Domain(err) => err,
            Self::InitialRefresh(message) => RemoteError::new("lock cloud", message).into(),
            other @ Self::NotSetUp => HubError::Storage(Box::new(other)),
        }
    }
}

impl From<LockError> for HubError {
    fn from(err: LockError) -> Self {
        err.into_domain()
    }
}
