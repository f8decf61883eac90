//! crates/ezchef_core/src/ports.rs
//!
//! Defines the service contracts (traits) the client core depends on.
//! These traits form the boundary of the hexagonal architecture: the core
//! describes *what* request to make and *what* to persist, and the service
//! crate decides how (reqwest, a JSON file, memory).

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy for every client operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Request { status: u16, message: String },
    /// Local form validation failed; nothing was sent.
    #[error("{0}")]
    Validation(String),
    /// No usable session; the caller must log in again.
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Request cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend rejected the access token. A 403 is a
    /// permission denial and does not qualify.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// A convenience type alias for `Result<T, ClientError>`.
pub type PortResult<T> = Result<T, ClientError>;

//=========================================================================================
// Request Description
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A transport-independent description of one backend call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Attach the stored bearer token, if any.
    pub authenticated: bool,
    /// Attach the `X-CSRFToken` header.
    pub csrf: bool,
    pub cancel: Option<CancellationToken>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authenticated: true,
            csrf: false,
            cancel: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Adds a query parameter. Empty values are dropped.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.query.push((key.to_string(), value));
        }
        self
    }

    /// Adds a query parameter only when a value is present.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` as the request's JSON payload.
    pub fn body<T: Serialize>(self, body: &T) -> PortResult<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(self.json(value))
    }

    pub fn without_auth(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn with_csrf(mut self) -> Self {
        self.csrf = true;
        self
    }

    pub fn with_cancel(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// The path plus its query string, as it would appear in a log line.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let pairs: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path, pairs.join("&"))
    }
}

/// Decodes a response body into `T`. An empty body is an error.
pub fn decode<T: DeserializeOwned>(body: Option<Value>) -> PortResult<T> {
    let value = body.ok_or_else(|| ClientError::Decode("empty response body".to_string()))?;
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Sends requests to the ezChef backend.
#[async_trait]
pub trait HttpService: Send + Sync {
    /// Performs the request. Resolves to the parsed JSON body, or `None` for
    /// an empty 2xx body.
    async fn send(&self, request: ApiRequest) -> PortResult<Option<Value>>;
}

/// Fixed key names for persisted session data.
pub mod keys {
    pub const AUTH_TOKEN: &str = "authToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const USER: &str = "user";
    pub const REMEMBERED_USER: &str = "rememberedUser";

    /// Keys removed on logout. `rememberedUser` deliberately survives.
    pub const SESSION: [&str; 3] = [AUTH_TOKEN, REFRESH_TOKEN, USER];
}

/// Durable client-side key/value storage for session data.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    fn remove(&self, key: &str) -> PortResult<()>;
}
