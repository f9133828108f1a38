use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::SessionUser;
use crate::utils::extract_api_message;

/// A single exchange with the admin API, before transport-specific encoding
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
    pub request_id: Uuid,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            bearer: None,
            body: None,
            request_id: Uuid::new_v4(),
        }
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// `PATCH /admin/user/fund/abc`, used as the log label
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Body of POST /auth/login
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from POST /auth/login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: SessionUser,
}

/// Comprehensive error type for API operations
///
/// The HTTP status decides success. A `success` flag in the payload is never
/// consulted; its `message` only feeds the error text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No bearer token in the session store, nothing was sent
    #[error("Not signed in")]
    Unauthenticated,
    /// 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 401 Unauthorized (expired or revoked token)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// 403 Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}

impl ApiError {
    /// Map a non-success status and its raw body to an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_api_message(body);
        match status {
            400 | 422 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::ServerError(status, message),
            _ => ApiError::HttpError(status, message),
        }
    }
}

/// Pull `key` out of a response envelope such as `{"users": [...]}`
pub fn take_field<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, ApiError> {
    let field = match body.get_mut(key).map(Value::take) {
        Some(Value::Null) | None => {
            return Err(ApiError::DeserializationError(format!(
                "Response has no `{}` field",
                key
            )))
        }
        Some(field) => field,
    };

    serde_json::from_value(field)
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse `{}`: {}", key, e)))
}

/// The server's `message` hint, if the payload carries one
pub fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping_prefers_payload_message() {
        let err = ApiError::from_status(404, r#"{"success":false,"message":"User not found"}"#);
        assert_eq!(err, ApiError::NotFound("User not found".to_string()));

        let err = ApiError::from_status(401, "jwt expired");
        assert_eq!(err, ApiError::Unauthorized("jwt expired".to_string()));

        let err = ApiError::from_status(502, "");
        assert!(matches!(err, ApiError::ServerError(502, _)));
    }

    #[test]
    fn test_take_field_reads_envelope() {
        let names: Vec<String> = take_field(json!({"bots": ["a", "b"]}), "bots").unwrap();
        assert_eq!(names, vec!["a", "b"]);

        let missing = take_field::<Vec<String>>(json!({"message": "ok"}), "bots");
        assert!(matches!(missing, Err(ApiError::DeserializationError(_))));

        let null = take_field::<Vec<String>>(json!({"bots": null}), "bots");
        assert!(null.is_err());
    }

    #[test]
    fn test_message_hint() {
        assert_eq!(
            message_of(&json!({"success": true, "message": "Status changed"})),
            Some("Status changed".to_string())
        );
        assert_eq!(message_of(&json!({"message": "  "})), None);
        assert_eq!(message_of(&Value::Null), None);
    }
}
