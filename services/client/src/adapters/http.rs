//! services/client/src/adapters/http.rs
//!
//! The HTTP client wrapper. It implements the `HttpService` port from the
//! `core` crate on top of `reqwest`, attaching JSON, bearer and CSRF headers
//! and turning every non-2xx response into an explicit `ClientError`.

use crate::config::Config;
use async_trait::async_trait;
use ezchef_core::ports::{
    keys, ApiRequest, ClientError, HttpService, Method, PortResult, SessionStorage,
};
use reqwest::{
    cookie::{CookieStore, Jar},
    header::CONTENT_TYPE,
    Client, StatusCode, Url,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `HttpService` against the ezChef REST backend.
#[derive(Clone)]
pub struct HttpAdapter {
    client: Client,
    base_url: Url,
    cookies: Arc<Jar>,
    csrf_fallback: Option<String>,
    storage: Arc<dyn SessionStorage>,
}

impl HttpAdapter {
    /// Creates a new `HttpAdapter`. The bearer token is read from `storage`
    /// on every request, so it always reflects the session store's latest
    /// write.
    pub fn new(config: &Config, storage: Arc<dyn SessionStorage>) -> PortResult<Self> {
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(cookies.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            cookies,
            csrf_fallback: config.csrf_token.clone(),
            storage,
        })
    }

    fn url_for(&self, request: &ApiRequest) -> PortResult<Url> {
        let raw = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path
        );
        let mut url = Url::parse(&raw).map_err(|e| ClientError::Network(e.to_string()))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn bearer_token(&self) -> Option<String> {
        match self.storage.get(keys::AUTH_TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read the stored access token: {}", e);
                None
            }
        }
    }

    /// The `csrftoken` cookie set by the backend, or the configured token.
    fn csrf_token(&self) -> Option<String> {
        self.cookies
            .cookies(&self.base_url)
            .and_then(|header| header.to_str().ok().map(str::to_owned))
            .and_then(|raw| cookie_value(&raw, CSRF_COOKIE))
            .or_else(|| self.csrf_fallback.clone())
    }

    async fn execute(&self, request: &ApiRequest) -> PortResult<Option<Value>> {
        let url = self.url_for(request)?;
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), url)
            .header(CONTENT_TYPE, "application/json");

        if request.authenticated {
            if let Some(token) = self.bearer_token() {
                builder = builder.bearer_auth(token);
            }
        }
        if request.csrf {
            if let Some(token) = self.csrf_token() {
                builder = builder.header(CSRF_HEADER, token);
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }
        parse_success_body(&body)
    }
}

//=========================================================================================
// `HttpService` Trait Implementation
//=========================================================================================

#[async_trait]
impl HttpService for HttpAdapter {
    async fn send(&self, request: ApiRequest) -> PortResult<Option<Value>> {
        debug!("{} {}", request.method.as_str(), request.target());

        let result = match request.cancel.clone() {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ClientError::Cancelled),
                    outcome = self.execute(&request) => outcome,
                }
            }
            None => self.execute(&request).await,
        };

        match &result {
            Err(ClientError::Cancelled) => {
                debug!("{} {} cancelled", request.method.as_str(), request.path)
            }
            Err(e) => warn!("{} {} failed: {}", request.method.as_str(), request.path, e),
            Ok(_) => {}
        }
        result
    }
}

//=========================================================================================
// Response Handling
//=========================================================================================

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Builds the error for a non-2xx response. The server's `message` (or
/// `detail`, or `error`) wins; anything unparseable falls back to the
/// status text.
pub(crate) fn error_from_response(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|json| server_message(&json))
        .unwrap_or_else(|| status_text(status));
    ClientError::request(status.as_u16(), message)
}

fn server_message(body: &Value) -> Option<String> {
    ["message", "detail", "error"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
    })
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn parse_success_body(body: &[u8]) -> PortResult<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// Extracts `name` from a `Cookie` header value such as `a=1; csrftoken=x`.
fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}
