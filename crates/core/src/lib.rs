//! Shared primitives for all Rust crates in formloom.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across formloom crates.
pub type AppResult<T> = Result<T, AppError>;

/// Identifier of a form definition as issued by the backend.
///
/// Backends hand out UUIDs, numeric ids or slugs, so the identifier is kept as
/// an opaque trimmed string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDefinitionId(String);

impl FormDefinitionId {
    /// Identifier used when a form was not issued by a backend.
    pub const LOCAL: &'static str = "local-form";

    /// Creates a validated form definition identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "form definition id must not be empty".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier for forms defined on the client side.
    #[must_use]
    pub fn local() -> Self {
        Self(Self::LOCAL.to_owned())
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for FormDefinitionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The remote endpoint could not be reached (no HTTP status).
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The remote endpoint answered with a non-success status.
    #[error("upstream returned status {status}: {message}")]
    UpstreamStatus {
        /// HTTP status code returned by the upstream.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// A payload could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP-like status code of the failure.
    ///
    /// Transport failures report `0`, mirroring what browsers expose for
    /// requests that never reached a server.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unavailable(_) => 0,
            Self::UpstreamStatus { status, .. } => *status,
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Decode(_) | Self::Internal(_) => 500,
        }
    }

    /// Renders the message shown to end users when loading a form fails.
    ///
    /// Only failures the server reported with a status carry that status.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unavailable(_) => {
                "Could not connect to the server. Check your connection.".to_owned()
            }
            Self::Decode(_) => "The server sent a form that could not be read".to_owned(),
            Self::Internal(_) => "Error loading the form".to_owned(),
            _ => format!("Error loading the form ({})", self.status_code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppError, FormDefinitionId};

    #[test]
    fn form_definition_id_is_trimmed() {
        let id = FormDefinitionId::new("  registration-v2 ");
        assert_eq!(id.ok().map(|id| id.to_string()), Some("registration-v2".to_owned()));
    }

    #[test]
    fn unavailable_errors_render_connection_message() {
        let error = AppError::Unavailable("connection refused".to_owned());
        assert_eq!(error.status_code(), 0);
        assert!(error.user_message().contains("connect"));
    }

    #[test]
    fn upstream_errors_render_status_code() {
        let error = AppError::UpstreamStatus {
            status: 503,
            message: "maintenance".to_owned(),
        };
        assert_eq!(error.user_message(), "Error loading the form (503)");
    }

    #[test]
    fn unreadable_and_internal_errors_render_without_a_status() {
        let decode = AppError::Decode("expected value at line 1 column 1".to_owned());
        let internal = AppError::Internal("store closed".to_owned());

        assert_eq!(
            decode.user_message(),
            "The server sent a form that could not be read"
        );
        assert_eq!(internal.user_message(), "Error loading the form");
        assert!(!decode.user_message().contains("500"));
    }
}
