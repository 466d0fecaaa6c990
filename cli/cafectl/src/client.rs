//! HTTP client for API communication.
//!
//! Every backend call goes through [`ApiClient`], which is composed from
//! three phases around a [`Transport`]:
//!
//! 1. [`attach_auth`] - content type and bearer token from the session
//! 2. the transport call itself
//! 3. [`classify_response`] then [`normalize`] on failure
//!
//! Write requests that succeed publish `api:success`; every failure
//! publishes `api:error` and is still returned to the caller.

use std::sync::Arc;

use anyhow::Result;
use cafe_events::{event_names, EventBus};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{CliError, ErrorKind, NormalizedError, RequestError, RequestFailure};
use crate::session::Session;
use crate::transport::{
    Method, OutboundRequest, ReqwestTransport, Transport, TransportError, TransportResponse,
    AUTHORIZATION, CONTENT_TYPE,
};

/// Shown after a successful POST.
pub const MSG_SAVED: &str = "Guardado exitosamente.";
/// Shown after a successful PUT.
pub const MSG_UPDATED: &str = "Actualizado exitosamente.";
/// Shown after a successful DELETE.
pub const MSG_DELETED: &str = "Eliminado exitosamente.";
/// Fallback for failures with nothing more specific to say.
pub const MSG_UNEXPECTED: &str = "Ocurrió un error inesperado.";
/// Request sent, no response received.
pub const MSG_NO_RESPONSE: &str = "No hay respuesta del servidor. Compruebe su conexión.";

/// Set the JSON content type and, if the session holds a token, the bearer header.
///
/// Without a token the Authorization header is removed rather than sent empty.
pub fn attach_auth(mut request: OutboundRequest, session: &Session) -> OutboundRequest {
    request.set_header(CONTENT_TYPE, "application/json");
    match session.token() {
        Some(token) => request.set_header(AUTHORIZATION, format!("Bearer {token}")),
        None => request.remove_header(AUTHORIZATION),
    }
    request
}

/// Notification text for a successful request, if the method warrants one.
pub fn success_message(method: Method) -> Option<&'static str> {
    match method {
        Method::Get => None,
        Method::Post => Some(MSG_SAVED),
        Method::Put => Some(MSG_UPDATED),
        Method::Delete => Some(MSG_DELETED),
    }
}

/// Parse a response body: empty is `null`, non-JSON text becomes a string.
pub fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Split a transport outcome into a parsed body or a failure.
pub fn classify_response(
    outcome: Result<TransportResponse, TransportError>,
) -> Result<Value, RequestFailure> {
    let response = outcome?;
    let body = parse_body(&response.body);

    if response.is_success() {
        Ok(body)
    } else {
        Err(RequestFailure::Status {
            status: response.status,
            body,
        })
    }
}

/// Derive the user-facing message and kind for a failure.
///
/// A non-empty object without `error` or `message` keys is read as a
/// field-to-message validation map, and a non-empty array as a list of
/// messages. This can misread other payloads that
/// happen to lack both keys; it is kept for compatibility with the backend.
pub fn normalize(failure: &RequestFailure) -> NormalizedError {
    match failure {
        RequestFailure::Status {
            body: Value::Object(data),
            ..
        } => {
            if !data.is_empty() && !data.contains_key("error") && !data.contains_key("message") {
                let message = data.values().map(join_text).collect::<Vec<_>>().join(", ");
                return NormalizedError::new(ErrorKind::ServerValidationError, message);
            }

            let explicit = data
                .get("message")
                .and_then(truthy_text)
                .or_else(|| data.get("error").and_then(truthy_text));
            match explicit {
                Some(message) => NormalizedError::new(ErrorKind::ServerError, message),
                None => NormalizedError::new(ErrorKind::UnknownError, MSG_UNEXPECTED),
            }
        }
        RequestFailure::Status {
            body: Value::Array(items),
            ..
        } if !items.is_empty() => {
            let message = items.iter().map(join_text).collect::<Vec<_>>().join(", ");
            NormalizedError::new(ErrorKind::ServerValidationError, message)
        }
        RequestFailure::Status { .. } => {
            NormalizedError::new(ErrorKind::UnknownError, MSG_UNEXPECTED)
        }
        RequestFailure::Transport(TransportError::NoResponse(_)) => {
            NormalizedError::new(ErrorKind::NetworkError, MSG_NO_RESPONSE)
        }
        RequestFailure::Transport(TransportError::Setup(_)) => {
            NormalizedError::new(ErrorKind::UnknownError, MSG_UNEXPECTED)
        }
    }
}

/// Text of a value that carries a message; empty, zero, false and null do not.
pub(crate) fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

/// Text of one validation-map value.
fn join_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(join_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// API client for the café backend.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
    bus: Arc<EventBus<String>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Session, bus: Arc<EventBus<String>>) -> Self {
        Self {
            transport,
            session,
            bus,
        }
    }

    /// Create a client talking to `config.api_url` over reqwest.
    pub fn from_config(config: &Config, session: Session, bus: Arc<EventBus<String>>) -> Result<Self> {
        let transport = ReqwestTransport::new(config.api_url())?;
        Ok(Self::new(Arc::new(transport), session, bus))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<Value, RequestError> {
        self.request(Method::Get, path, None).await
    }

    /// Make a POST request.
    pub async fn post(&self, path: &str, body: Value) -> Result<Value, RequestError> {
        self.request(Method::Post, path, Some(body)).await
    }

    /// Make a PUT request.
    pub async fn put(&self, path: &str, body: Value) -> Result<Value, RequestError> {
        self.request(Method::Put, path, Some(body)).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Value, RequestError> {
        self.request(Method::Delete, path, None).await
    }

    /// Send one request through all phases.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, RequestError> {
        let mut request = OutboundRequest::new(method, path);
        request.body = body;
        let request = attach_auth(request, &self.session);

        debug!(%method, path, "sending request");
        let outcome = self.transport.send(request).await;

        match classify_response(outcome) {
            Ok(value) => {
                debug!(%method, path, "request succeeded");
                if let Some(message) = success_message(method) {
                    self.bus.publish(event_names::API_SUCCESS, message.to_string());
                }
                Ok(value)
            }
            Err(failure) => {
                let normalized = normalize(&failure);
                warn!(%method, path, error = %failure, message = %normalized, "request failed");
                self.bus
                    .publish(event_names::API_ERROR, normalized.message.clone());
                Err(RequestError {
                    normalized,
                    failure,
                })
            }
        }
    }

    /// GET and deserialize.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CliError> {
        let value = self.get(path).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST a serializable body and deserialize the response.
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CliError> {
        let value = self.post(path, serde_json::to_value(body)?).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// PUT a serializable body and deserialize the response.
    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CliError> {
        let value = self.put(path, serde_json::to_value(body)?).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::testing::{record, ScriptedTransport};
    use super::*;

    fn client_with(transport: Arc<ScriptedTransport>, session: Session) -> (ApiClient, Arc<EventBus<String>>) {
        let bus = Arc::new(EventBus::new());
        (ApiClient::new(transport, session, Arc::clone(&bus)), bus)
    }

    #[test]
    fn test_attach_auth_with_token() {
        let session = Session::in_memory();
        session.set_session("abc", "admin").unwrap();

        let request = attach_auth(OutboundRequest::new(Method::Get, "/products"), &session);
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer abc"));
        assert_eq!(request.header(CONTENT_TYPE), Some("application/json"));
    }

    #[test]
    fn test_attach_auth_without_token_omits_header() {
        let session = Session::in_memory();
        let mut request = OutboundRequest::new(Method::Post, "/reservations");
        request.set_header(AUTHORIZATION, "");

        let request = attach_auth(request, &session);
        assert_eq!(request.header(AUTHORIZATION), None);
        assert_eq!(request.header(CONTENT_TYPE), Some("application/json"));
        assert_eq!(request.headers().count(), 1);
    }

    #[rstest]
    #[case::validation_map(json!({"field1": "required", "field2": "too long"}), ErrorKind::ServerValidationError, "required, too long")]
    #[case::message(json!({"message": "Invalid credentials"}), ErrorKind::ServerError, "Invalid credentials")]
    #[case::error_key(json!({"error": "Not Found", "status": 404}), ErrorKind::ServerError, "Not Found")]
    #[case::message_wins(json!({"error": "Bad Request", "message": "name is required"}), ErrorKind::ServerError, "name is required")]
    #[case::empty_message_falls_to_error(json!({"message": "", "error": "Conflict"}), ErrorKind::ServerError, "Conflict")]
    #[case::blank_keys(json!({"message": null}), ErrorKind::UnknownError, MSG_UNEXPECTED)]
    #[case::empty_object(json!({}), ErrorKind::UnknownError, MSG_UNEXPECTED)]
    #[case::message_list(json!(["name is required", "price must be positive"]), ErrorKind::ServerValidationError, "name is required, price must be positive")]
    #[case::empty_list(json!([]), ErrorKind::UnknownError, MSG_UNEXPECTED)]
    #[case::text_body(json!("Internal Server Error"), ErrorKind::UnknownError, MSG_UNEXPECTED)]
    #[case::no_body(Value::Null, ErrorKind::UnknownError, MSG_UNEXPECTED)]
    #[case::mixed_values(json!({"price": ["must be positive", "must be a number"], "name": null}), ErrorKind::ServerValidationError, "must be positive,must be a number, ")]
    fn test_normalize_server_payloads(
        #[case] body: Value,
        #[case] kind: ErrorKind,
        #[case] message: &str,
    ) {
        let normalized = normalize(&RequestFailure::Status { status: 400, body });
        assert_eq!(normalized.kind, kind);
        assert_eq!(normalized.message, message);
    }

    #[test]
    fn test_normalize_transport_failures() {
        let offline = normalize(&RequestFailure::Transport(TransportError::NoResponse(
            "connection refused".into(),
        )));
        assert_eq!(offline.kind, ErrorKind::NetworkError);
        assert_eq!(offline.message, MSG_NO_RESPONSE);

        let setup = normalize(&RequestFailure::Transport(TransportError::Setup(
            "bad header".into(),
        )));
        assert_eq!(setup.kind, ErrorKind::UnknownError);
        assert_eq!(setup.message, MSG_UNEXPECTED);
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
        assert_eq!(
            parse_body("{\"name\":\"Café\"}".as_bytes()),
            json!({"name": "Café"})
        );
        assert_eq!(parse_body(b"OK"), json!("OK"));
    }

    #[tokio::test]
    async fn test_get_publishes_nothing() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(200, json!([{"id": 1, "name": "Bebidas"}]));
        let (client, bus) = client_with(Arc::clone(&transport), Session::in_memory());
        let successes = record(&bus, event_names::API_SUCCESS);
        let errors = record(&bus, event_names::API_ERROR);

        let value = client.get("/categories").await.unwrap();

        assert_eq!(value, json!([{"id": 1, "name": "Bebidas"}]));
        assert!(successes.lock().unwrap().is_empty());
        assert!(errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_publish_one_success_each() {
        let transport = Arc::new(ScriptedTransport::default());
        transport
            .reply(201, json!({"id": 7, "name": "Postres"}))
            .reply(200, json!({"id": 7, "name": "Dulces"}))
            .reply(204, Value::Null);
        let (client, bus) = client_with(Arc::clone(&transport), Session::in_memory());
        let successes = record(&bus, event_names::API_SUCCESS);

        client.post("/categories", json!({"name": "Postres"})).await.unwrap();
        client.put("/categories/7", json!({"name": "Dulces"})).await.unwrap();
        let deleted = client.delete("/categories/7").await.unwrap();

        assert_eq!(deleted, Value::Null);
        assert_eq!(
            *successes.lock().unwrap(),
            vec![MSG_SAVED, MSG_UPDATED, MSG_DELETED]
        );
    }

    #[tokio::test]
    async fn test_failure_publishes_one_error_and_propagates() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(400, json!({"name": "must not be blank"}));
        let (client, bus) = client_with(Arc::clone(&transport), Session::in_memory());
        let successes = record(&bus, event_names::API_SUCCESS);
        let errors = record(&bus, event_names::API_ERROR);

        let err = client
            .post("/products", json!({"name": ""}))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ServerValidationError);
        assert_eq!(err.status(), Some(400));
        assert_eq!(*errors.lock().unwrap(), vec!["must not be blank"]);
        assert!(successes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_message() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.fail(TransportError::NoResponse("connection refused".into()));
        let (client, bus) = client_with(Arc::clone(&transport), Session::in_memory());
        let errors = record(&bus, event_names::API_ERROR);

        let err = client.get("/news").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert!(matches!(
            err.failure,
            RequestFailure::Transport(TransportError::NoResponse(_))
        ));
        assert_eq!(*errors.lock().unwrap(), vec![MSG_NO_RESPONSE]);
    }

    #[tokio::test]
    async fn test_token_read_per_request() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(200, json!([])).reply(200, json!([]));
        let session = Session::in_memory();
        let (client, _bus) = client_with(Arc::clone(&transport), session.clone());

        client.get("/reservations").await.unwrap();
        session.set_session("abc", "admin").unwrap();
        client.get("/reservations").await.unwrap();

        let seen = transport.requests();
        assert_eq!(seen[0].header(AUTHORIZATION), None);
        assert_eq!(seen[1].header(AUTHORIZATION), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_decode_error_does_not_publish_twice() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(200, json!({"unexpected": true}));
        let (client, bus) = client_with(Arc::clone(&transport), Session::in_memory());
        let errors = record(&bus, event_names::API_ERROR);

        let result: Result<Vec<String>, CliError> = client.get_json("/news").await;

        assert!(matches!(result, Err(CliError::Decode(_))));
        assert!(errors.lock().unwrap().is_empty());
    }
}
