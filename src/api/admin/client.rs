use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::models::{ApiError, ApiRequest};
use crate::session::SessionStore;

/// Executes one request against the admin backend
///
/// Implementations must treat any non-2xx status as an error and return the
/// decoded JSON body (or `Value::Null` for an empty body) on success.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

/// reqwest-backed transport for the Trove admin REST API
pub struct HttpTransport {
    http_client: HttpClient,
    base_url: String,
}

impl HttpTransport {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api";

    /// Create a transport rooted at `base_url` (trailing slash optional)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn create_headers(request: &ApiRequest) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request_id = HeaderValue::from_str(&request.request_id.to_string())
            .map_err(|e| ApiError::RequestError(format!("Failed to create request id header: {}", e)))?;
        headers.insert("X-Request-Id", request_id);

        if let Some(token) = &request.bearer {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::RequestError(format!("Failed to create auth header: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    async fn handle_error_response(request: &ApiRequest, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body_text = response.text().await.unwrap_or_default();

        if status >= 500 {
            warn!(request_id = %request.request_id, "{} failed with {}: {}", request.label(), status, body_text);
        } else {
            debug!(request_id = %request.request_id, "{} rejected with {}", request.label(), status);
        }

        ApiError::from_status(status, &body_text)
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let headers = Self::create_headers(&request)?;

        debug!(request_id = %request.request_id, "-> {}", request.label());

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(&request, response).await);
        }

        let body_text = response
            .text()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to read response: {}", e)))?;

        if body_text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body_text)
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}

/// Authenticated admin API handle
///
/// Reads the bearer token from the injected session store on every call, so a
/// login or logout is visible to every controller holding a clone.
pub struct AdminApi<T> {
    transport: Arc<T>,
    session: Arc<dyn SessionStore>,
}

impl<T> Clone for AdminApi<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: Arc::clone(&self.session),
        }
    }
}

impl<T: Transport> AdminApi<T> {
    pub fn new(transport: Arc<T>, session: Arc<dyn SessionStore>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// GET an authenticated resource
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, None).await
    }

    /// PATCH a JSON body
    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(Method::PATCH, path, Some(encode(body)?)).await
    }

    /// POST a JSON body
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.send(Method::POST, path, Some(encode(body)?)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::DELETE, path, None).await
    }

    /// POST without a bearer token (login)
    pub async fn post_public<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let request = ApiRequest::new(Method::POST, path).json(encode(body)?);
        self.transport.execute(request).await
    }

    /// Send an authenticated request; refuses locally when signed out
    pub async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let token = self.session.token().ok_or(ApiError::Unauthenticated)?;

        let mut request = ApiRequest::new(method, path).bearer(token);
        request.body = body;
        self.transport.execute(request).await
    }
}

fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::RequestError(format!("Failed to encode request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::admin::fake::FakeTransport;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_authenticated_request_carries_bearer() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("GET /admin/all-bots", Ok(json!({"bots": []})));
        let session = Arc::new(MemorySessionStore::signed_in("tok-123"));
        let api = AdminApi::new(Arc::clone(&transport), session);

        api.get("/admin/all-bots").await.expect("request failed");

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bearer.as_deref(), Some("tok-123"));
        assert_eq!(sent[0].method, Method::GET);
    }

    #[tokio::test]
    async fn test_signed_out_sends_nothing() {
        let transport = Arc::new(FakeTransport::new());
        let api = AdminApi::new(Arc::clone(&transport), Arc::new(MemorySessionStore::new()));

        let err = api.delete("/admin/user/delete/1").await.unwrap_err();

        assert_eq!(err, ApiError::Unauthenticated);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_public_post_has_no_bearer() {
        let transport = Arc::new(FakeTransport::new());
        transport.respond("POST /auth/login", Ok(json!({"token": "t"})));
        let session = Arc::new(MemorySessionStore::signed_in("stale"));
        let api = AdminApi::new(Arc::clone(&transport), session);

        api.post_public("/auth/login", &json!({"email": "a@b.c"})).await.unwrap();

        let sent = transport.requests();
        assert!(sent[0].bearer.is_none());
        assert_eq!(sent[0].body, Some(json!({"email": "a@b.c"})));
    }

    #[test]
    fn test_headers_include_request_id_and_auth() {
        let request = ApiRequest::new(Method::GET, "/admin/all-users").bearer("abc");
        let headers = HttpTransport::create_headers(&request).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(
            headers.get("X-Request-Id").unwrap().to_str().unwrap(),
            request.request_id.to_string()
        );
    }
}
