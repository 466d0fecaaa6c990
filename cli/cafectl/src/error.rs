//! Error types and display for the console.

use colored::Colorize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::session::SessionError;
use crate::transport::TransportError;

/// Stable classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received.
    NetworkError,
    /// The server returned a field-name to message map.
    ServerValidationError,
    /// The server returned a `message` or `error`.
    ServerError,
    /// Anything else, including failures before the request was sent.
    UnknownError,
}

/// A failure translated into a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub message: String,
    pub kind: ErrorKind,
}

impl NormalizedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// What actually went wrong with a request.
#[derive(Debug, Clone, Error)]
pub enum RequestFailure {
    /// The server answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        /// Parsed body; non-JSON text is kept as a string, empty as null.
        body: serde_json::Value,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Error returned by every [`ApiClient`](crate::client::ApiClient) call.
///
/// Displays the normalized message; the raw failure is the error source.
#[derive(Debug, Clone, Error)]
#[error("{normalized}")]
pub struct RequestError {
    pub normalized: NormalizedError,
    #[source]
    pub failure: RequestFailure,
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        self.normalized.kind
    }

    pub fn message(&self) -> &str {
        &self.normalized.message
    }

    /// HTTP status, when the server responded.
    pub fn status(&self) -> Option<u16> {
        match &self.failure {
            RequestFailure::Status { status, .. } => Some(*status),
            RequestFailure::Transport(_) => None,
        }
    }
}

/// Console errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not authenticated. Run `cafe auth login` to access {0}.")]
    NotAuthenticated(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

fn request_error(err: &anyhow::Error) -> Option<&RequestError> {
    err.downcast_ref::<RequestError>()
        .or_else(|| match err.downcast_ref::<CliError>() {
            Some(CliError::Request(e)) => Some(e),
            _ => None,
        })
}

/// Print an error in a user-friendly format.
///
/// Request failures have already been shown as notifications, so only the
/// hint is added for them.
pub fn print_error(err: &anyhow::Error) {
    if let Some(req) = request_error(err) {
        if let Some(hint) = request_hint(req) {
            eprintln!("{}", hint.yellow());
        }
        return;
    }

    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::NotAuthenticated(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Run `cafe auth login --username <user>` to authenticate.".yellow()
                );
            }
            CliError::Decode(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check that CAFE_API_URL points at the café backend.".yellow()
                );
            }
            _ => {}
        }
    }
}

fn request_hint(err: &RequestError) -> Option<&'static str> {
    match (err.kind(), err.status()) {
        (ErrorKind::NetworkError, _) => {
            Some("Hint: Check your network connection and CAFE_API_URL.")
        }
        (_, Some(401)) => Some("Hint: Your session may have expired. Run `cafe auth login`."),
        (_, Some(403)) => Some("Hint: You may not have permission for this operation."),
        _ => None,
    }
}
