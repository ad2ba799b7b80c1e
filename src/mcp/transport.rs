//! MCP HTTP Transport
//!
//! Exposes the MCP interface over HTTP with Server-Sent Events:
//! `GET /sse` opens an event stream, `POST /sse` carries JSON-RPC requests.
//! `/health`, `/tools`, `/capabilities` and `/` are plain JSON endpoints.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use super::{
    error::{codes, JsonRpcError, McpError},
    interface::McpInterface,
    sse::{session_stream, SseSessions},
    types::{JsonRpcResponse, PROTOCOL_VERSION},
};

/// Shared state for MCP HTTP handlers
#[derive(Clone)]
pub struct McpHttpState {
    pub mcp: Arc<McpInterface>,
    pub sessions: Arc<SseSessions>,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Create the Axum router for the HTTP transport
pub fn mcp_router(mcp: Arc<McpInterface>) -> Router {
    router_with_state(McpHttpState {
        mcp,
        sessions: Arc::new(SseSessions::new()),
    })
}

pub fn router_with_state(state: McpHttpState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/tools", get(handle_tools))
        .route("/capabilities", get(handle_capabilities))
        .route("/sse", get(handle_sse_get).post(handle_sse_post))
        .fallback(handle_fallback)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(mcp: Arc<McpInterface>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;

    tracing::info!("MCP HTTP transport listening on http://{}", local);
    tracing::info!("  SSE endpoint: http://{}/sse", local);
    tracing::info!("  Health check: http://{}/health", local);

    axum::serve(listener, mcp_router(mcp))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down HTTP transport");
}

/// Handle GET /sse
async fn handle_sse_get(State(state): State<McpHttpState>) -> impl IntoResponse {
    session_stream(state.sessions.clone()).await
}

/// Handle POST /sse
///
/// Answers the JSON-RPC request in the HTTP response. When `sessionId` names a
/// live SSE session the response is also pushed to that stream.
async fn handle_sse_post(
    State(state): State<McpHttpState>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Response {
    let response = match std::str::from_utf8(&body) {
        Ok(text) => state.mcp.handle_text(text).await,
        Err(e) => Some(JsonRpcResponse::error(
            Value::Null,
            McpError::ParseError(e.to_string()).into(),
        )),
    };

    let Some(response) = response else {
        return StatusCode::ACCEPTED.into_response();
    };

    if let Some(raw) = query.session_id.as_deref() {
        match Uuid::parse_str(raw) {
            Ok(id) => {
                if !state.sessions.push(&id, response.clone()).await {
                    tracing::debug!(session_id = %raw, "No live SSE session for response");
                }
            }
            Err(_) => tracing::debug!(session_id = %raw, "Ignoring malformed session id"),
        }
    }

    (StatusCode::OK, Json(response)).into_response()
}

async fn handle_health(State(state): State<McpHttpState>) -> Json<Value> {
    let registry = state.mcp.registry();
    let modules = registry.modules();
    let status = if modules.iter().all(|m| m.available) {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "server": state.mcp.server_info().name,
        "version": state.mcp.server_info().version,
        "protocolVersion": PROTOCOL_VERSION,
        "timestamp": Utc::now().to_rfc3339(),
        "tools": registry.tool_count(),
        "sseSessions": state.sessions.len().await,
        "modules": modules,
    }))
}

async fn handle_tools(State(state): State<McpHttpState>) -> Json<Value> {
    let tools = state.mcp.registry().list_tools();
    Json(json!({
        "count": tools.len(),
        "tools": tools,
    }))
}

async fn handle_capabilities(State(state): State<McpHttpState>) -> Json<Value> {
    Json(json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": state.mcp.capabilities(),
        "serverInfo": state.mcp.server_info(),
        "modules": state.mcp.registry().modules(),
    }))
}

async fn handle_root(State(state): State<McpHttpState>) -> Json<Value> {
    Json(json!({
        "name": state.mcp.server_info().name,
        "version": state.mcp.server_info().version,
        "description": "GoHighLevel CRM tools over the Model Context Protocol",
        "protocolVersion": PROTOCOL_VERSION,
        "endpoints": {
            "sse": "/sse",
            "health": "/health",
            "tools": "/tools",
            "capabilities": "/capabilities",
        },
    }))
}

async fn handle_fallback(uri: Uri) -> Response {
    tracing::warn!("Unmatched route: {}", uri);
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "path": uri.path(),
            "hint": "MCP endpoint is at /sse",
        })),
    )
        .into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(detail = %detail, "Handler panicked");

    let body = JsonRpcResponse::error(
        Value::Null,
        JsonRpcError {
            code: codes::INTERNAL_ERROR,
            message: "Internal error".to_string(),
            data: Some(json!({ "detail": detail })),
        },
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_registry;
    use crate::client::GhlClient;
    use crate::testing::StubUpstream;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use futures::StreamExt;
    use tower::ServiceExt;

    async fn test_app(upstream: &StubUpstream) -> Router {
        let client = Arc::new(GhlClient::new(upstream.api_config()).unwrap());
        let registry = build_registry(client, &[]).unwrap();
        mcp_router(Arc::new(McpInterface::new(Arc::new(registry))))
    }

    fn post_sse(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let app = test_app(&upstream).await;

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["server"], "ghl-mcp-server");
        assert_eq!(json["modules"].as_array().unwrap().len(), 19);
        assert!(json["tools"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_tools_endpoint_matches_tools_list() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let app = test_app(&upstream).await;

        let listing = json_body(app.clone().oneshot(get("/tools")).await.unwrap()).await;
        let rpc = json_body(
            app.oneshot(post_sse("/sse", r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#))
                .await
                .unwrap(),
        )
        .await;

        let names = |tools: &Value| -> Vec<String> {
            tools
                .as_array()
                .unwrap()
                .iter()
                .map(|t| t["name"].as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(names(&listing["tools"]), names(&rpc["result"]["tools"]));
        assert_eq!(listing["count"], listing["tools"].as_array().unwrap().len());
    }

    #[tokio::test]
    async fn test_create_contact_example() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({"contact": {"id": "c1"}})).await;
        let app = test_app(&upstream).await;

        let response = app
            .oneshot(post_sse(
                "/sse",
                r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"create_contact","arguments":{"firstName":"A"}}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"content": [{"type": "text", "text": "{\n  \"contact\": {\n    \"id\": \"c1\"\n  }\n}"}]}
            })
        );
    }

    #[tokio::test]
    async fn test_notification_is_accepted_without_body() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let app = test_app(&upstream).await;

        let response = app
            .oneshot(post_sse("/sse", r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let app = test_app(&upstream).await;

        let response = app.oneshot(post_sse("/sse", "{oops")).await.unwrap();
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], -32700);
        assert_eq!(json["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let app = test_app(&upstream).await;

        let response = app.oneshot(get("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Not found");
    }

    #[tokio::test]
    async fn test_root_and_capabilities() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let app = test_app(&upstream).await;

        let root = json_body(app.clone().oneshot(get("/")).await.unwrap()).await;
        assert_eq!(root["endpoints"]["sse"], "/sse");

        let caps = json_body(app.oneshot(get("/capabilities")).await.unwrap()).await;
        assert_eq!(caps["protocolVersion"], PROTOCOL_VERSION);
        assert!(caps["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_sse_session_receives_responses() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let app = test_app(&upstream).await;

        let response = app.clone().oneshot(get("/sse")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let mut events = response.into_body().into_data_stream();

        let first = events.next().await.unwrap().unwrap();
        let first = String::from_utf8(first.to_vec()).unwrap();
        assert!(first.contains("event: endpoint"));
        let endpoint = first
            .lines()
            .find_map(|l| l.strip_prefix("data: "))
            .unwrap()
            .to_string();
        assert!(endpoint.starts_with("/sse?sessionId="));

        let response = app
            .oneshot(post_sse(&endpoint, r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["id"], 7);

        let pushed = events.next().await.unwrap().unwrap();
        let pushed = String::from_utf8(pushed.to_vec()).unwrap();
        assert!(pushed.contains("event: message"));
        assert!(pushed.contains(r#""id":7"#));
    }

    #[test]
    fn test_panic_becomes_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
