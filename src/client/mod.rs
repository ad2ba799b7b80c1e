//! GoHighLevel REST client
//!
//! One [`GhlClient`] is built at startup and shared by every tool module.
//! It carries the bearer token, base URL, default `Version` header and the
//! default location id. It is never mutated after construction.

mod error;

pub use error::ApiError;

use std::fmt;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{multipart, Method};
use serde::Serialize;
use serde_json::Value;

/// Public LeadConnector API endpoint
pub const DEFAULT_BASE_URL: &str = "https://services.leadconnectorhq.com";
/// Default `Version` header value
pub const DEFAULT_API_VERSION: &str = "2021-07-28";
/// `Version` header required by the conversations and calendars endpoints
pub const LEGACY_API_VERSION: &str = "2021-04-15";

/// Characters left untouched in a path segment (RFC 3986 unreserved)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a caller supplied value for use as one path segment
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Upstream connection settings
#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub api_version: String,
    pub location_id: String,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("location_id", &self.location_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Shared GoHighLevel API client
pub struct GhlClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    api_version: String,
    location_id: String,
}

impl GhlClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("ghl-mcp-server/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version,
            location_id: config.location_id,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Location id used when a tool call does not name one
    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    /// The caller's location id, or the configured default
    pub fn location_or_default(&self, explicit: Option<String>) -> String {
        explicit
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| self.location_id.clone())
    }

    /// Start a request. `path` is relative to the base URL and starts with `/`.
    pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest {
            client: self,
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            version: None,
        }
    }

    pub fn get(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::DELETE, path)
    }
}

enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A single upstream call being assembled
pub struct ApiRequest<'a> {
    client: &'a GhlClient,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    version: Option<&'static str>,
}

impl<'a> ApiRequest<'a> {
    /// Append the fields of `params` as query parameters.
    ///
    /// Null fields are skipped, arrays become repeated keys and nested
    /// objects are sent as JSON text.
    pub fn query<T: Serialize>(mut self, params: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params).map_err(ApiError::Encode)?;
        if let Value::Object(map) = value {
            for (key, value) in map {
                match value {
                    Value::Null => {}
                    Value::Array(items) => {
                        for item in items {
                            if let Some(text) = scalar_to_string(&item) {
                                self.query.push((key.clone(), text));
                            }
                        }
                    }
                    other => {
                        if let Some(text) = scalar_to_string(&other) {
                            self.query.push((key, text));
                        }
                    }
                }
            }
        }
        Ok(self)
    }

    /// Add a single query parameter
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Send `body` as JSON. Top-level null fields are dropped.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let mut value = serde_json::to_value(body).map_err(ApiError::Encode)?;
        if let Value::Object(map) = &mut value {
            map.retain(|_, v| !v.is_null());
        }
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Send text fields as `multipart/form-data`
    pub fn multipart(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }

    /// Override the `Version` header for this request
    pub fn version(mut self, version: &'static str) -> Self {
        self.version = Some(version);
        self
    }

    /// Perform the call and return the parsed body (`null` when empty)
    pub async fn send(self) -> Result<Value, ApiError> {
        let client = self.client;
        let url = format!("{}{}", client.base_url, self.path);
        let version = self.version.unwrap_or(client.api_version.as_str());

        tracing::debug!(
            method = %self.method,
            path = %self.path,
            query_params = self.query.len(),
            "GoHighLevel request"
        );

        let mut request = client
            .http
            .request(self.method.clone(), &url)
            .bearer_auth(&client.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("Version", version);

        if !self.query.is_empty() {
            request = request.query(&self.query);
        }

        request = match self.body {
            Some(RequestBody::Json(body)) => request.json(&body),
            Some(RequestBody::Form(fields)) => {
                let form = fields
                    .into_iter()
                    .fold(multipart::Form::new(), |form, (k, v)| form.text(k, v));
                request.multipart(form)
            }
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            tracing::warn!(
                method = %self.method,
                path = %self.path,
                status = status.as_u16(),
                "GoHighLevel request failed"
            );
            return Err(ApiError::status(status.as_u16(), body));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
