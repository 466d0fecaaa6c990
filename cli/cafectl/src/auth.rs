//! Authentication service.
//!
//! The only code allowed to create or destroy a session. Login talks to the
//! transport directly: it carries no bearer token and publishes no
//! notifications, callers report the outcome inline.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{classify_response, truthy_text};
use crate::error::RequestFailure;
use crate::session::{Session, SessionError};
use crate::transport::{Method, OutboundRequest, Transport, CONTENT_TYPE};

/// Backend login endpoint.
pub const AUTH_LOGIN_PATH: &str = "/auth/login";

/// Fallback when the server gives no reason.
pub const MSG_LOGIN_FAILED: &str = "Login failed";

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the credentials or could not be reached.
    #[error("{0}")]
    LoginFailed(String),

    /// The token was issued but could not be persisted.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Performs login and logout against the backend.
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
    session: Session,
}

impl AuthService {
    pub fn new(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { transport, session }
    }

    /// Exchange credentials for a token.
    ///
    /// When the response carries a token the session is replaced; the raw
    /// payload is returned either way.
    pub async fn login(&self, username: &str, password: &str) -> Result<Value, AuthError> {
        let mut request = OutboundRequest::new(Method::Post, AUTH_LOGIN_PATH)
            .with_body(json!({ "username": username, "password": password }));
        request.set_header(CONTENT_TYPE, "application/json");

        let payload = match classify_response(self.transport.send(request).await) {
            Ok(payload) => payload,
            Err(failure) => {
                let message = login_failure_message(&failure);
                warn!(username, error = %failure, "login rejected");
                return Err(AuthError::LoginFailed(message));
            }
        };

        let token = payload
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty());
        if let Some(token) = token {
            let stored_username = payload
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or(username);
            self.session.set_session(token, stored_username)?;
            info!(username = stored_username, "logged in");
        } else {
            warn!(username, "login response carried no token");
        }

        Ok(payload)
    }

    /// Drop the current session.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.session.clear_session()?;
        info!("logged out");
        Ok(())
    }

    /// Username of the authenticated user, if any.
    pub fn current_user(&self) -> Option<String> {
        if self.session.is_authenticated() {
            self.session.username()
        } else {
            None
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// The server's `message`, or the generic fallback.
fn login_failure_message(failure: &RequestFailure) -> String {
    let server_message = match failure {
        RequestFailure::Status { body, .. } => body.get("message").and_then(truthy_text),
        RequestFailure::Transport(_) => None,
    };
    server_message.unwrap_or_else(|| MSG_LOGIN_FAILED.to_string())
}

#[cfg(test)]
mod tests {
    use crate::client::testing::ScriptedTransport;
    use crate::transport::{TransportError, AUTHORIZATION};

    use super::*;

    fn service() -> (AuthService, Arc<ScriptedTransport>, Session) {
        let transport = Arc::new(ScriptedTransport::default());
        let session = Session::in_memory();
        let service = AuthService::new(transport.clone(), session.clone());
        (service, transport, session)
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let (auth, transport, session) = service();
        transport.reply(200, json!({"token": "abc", "username": "admin"}));

        let payload = auth.login("admin", "admin").await.unwrap();

        assert_eq!(payload["token"], "abc");
        assert!(session.is_authenticated());
        assert_eq!(session.username().as_deref(), Some("admin"));
        assert_eq!(auth.current_user().as_deref(), Some("admin"));

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, AUTH_LOGIN_PATH);
        assert_eq!(sent.method, Method::Post);
        assert_eq!(
            sent.body,
            Some(json!({"username": "admin", "password": "admin"}))
        );
        assert_eq!(sent.header(AUTHORIZATION), None);

        auth.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.username(), None);
        assert_eq!(auth.current_user(), None);
    }

    #[tokio::test]
    async fn test_login_without_username_in_response_keeps_login_name() {
        let (auth, transport, session) = service();
        transport.reply(200, json!({"token": "abc"}));

        auth.login("barista", "secret").await.unwrap();

        assert_eq!(session.username().as_deref(), Some("barista"));
    }

    #[tokio::test]
    async fn test_login_without_token_leaves_session_alone() {
        let (auth, transport, session) = service();
        transport.reply(200, json!({"status": "pending"}));

        let payload = auth.login("admin", "admin").await.unwrap();

        assert_eq!(payload, json!({"status": "pending"}));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_uses_server_message() {
        let (auth, transport, session) = service();
        transport.reply(401, json!({"message": "Invalid credentials"}));

        let err = auth.login("admin", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_failure_fallbacks() {
        let (auth, transport, _session) = service();
        transport
            .reply(500, json!({"error": "Internal Server Error"}))
            .fail(TransportError::NoResponse("connection refused".into()));

        let err = auth.login("admin", "admin").await.unwrap_err();
        assert_eq!(err.to_string(), MSG_LOGIN_FAILED);

        let err = auth.login("admin", "admin").await.unwrap_err();
        assert!(matches!(err, AuthError::LoginFailed(ref m) if m == MSG_LOGIN_FAILED));
    }
}
