//! Test support: a throwaway HTTP server standing in for the GoHighLevel API.
//!
//! Used by the unit tests in this crate and by the integration tests under
//! `tests/`. It records every request it receives and answers with a canned
//! response.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::client::{ApiConfig, DEFAULT_API_VERSION};

/// A request captured by [`StubUpstream`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    /// Body parsed as JSON (`null` when empty or not JSON)
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

type Responder = dyn Fn(&RecordedRequest) -> (StatusCode, String) + Send + Sync;

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responder: Arc<Responder>,
}

/// Stub upstream API bound to an ephemeral localhost port
pub struct StubUpstream {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubUpstream {
    /// Answer every request with `status` and the JSON `body`
    pub async fn spawn(status: StatusCode, body: Value) -> Self {
        let text = body.to_string();
        Self::spawn_with(move |_| (status, text.clone())).await
    }

    /// Answer every request with `status` and a raw text body
    pub async fn spawn_raw(status: StatusCode, body: &str) -> Self {
        let text = body.to_string();
        Self::spawn_with(move |_| (status, text.clone())).await
    }

    /// Answer each request with whatever `responder` returns
    pub async fn spawn_with<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> (StatusCode, String) + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            requests: requests.clone(),
            responder: Arc::new(responder),
        };

        let app = Router::new().fallback(record).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub upstream");
        let addr = listener.local_addr().expect("stub upstream address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client settings pointing at this stub
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            api_key: "test-token".to_string(),
            base_url: self.base_url(),
            api_version: DEFAULT_API_VERSION.to_string(),
            location_id: "test-location".to_string(),
            timeout: Some(std::time::Duration::from_secs(5)),
        }
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Drop for StubUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect(),
        body: body.to_vec(),
    };

    let (status, text) = (state.responder)(&request);
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(request);
    }

    (status, [("content-type", "application/json")], text).into_response()
}
