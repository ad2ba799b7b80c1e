//! MCP Interface
//!
//! Routes MCP protocol methods to the tool registry. Shared by the stdio and
//! HTTP transports, which only differ in how messages arrive and leave.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};

use super::{
    error::McpError,
    types::{
        CallToolParams, CallToolResult, InitializeResult, JsonRpcRequest, JsonRpcResponse,
        ResourceTemplate, ServerCapabilities, ServerInfo, ToolsListResult, PROTOCOL_VERSION,
    },
};
use crate::registry::ToolRegistry;

/// The MCP Interface - routes MCP protocol methods to handlers
pub struct McpInterface {
    registry: Arc<ToolRegistry>,
    server_info: ServerInfo,
}

impl McpInterface {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            server_info: ServerInfo::default(),
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    pub fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities::default()
    }

    /// Route an MCP method to its handler
    pub async fn handle(&self, method: &str, params: Value) -> Result<Value, McpError> {
        tracing::debug!(method = %method, "Handling MCP request");

        match method {
            // Lifecycle
            "initialize" => self.handle_initialize(params),
            "notifications/initialized" => {
                tracing::info!("MCP client initialized");
                Ok(json!({}))
            }
            "notifications/cancelled" => {
                tracing::debug!(params = %params, "Cancellation received; in-flight calls run to completion");
                Ok(json!({}))
            }

            // Utility
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(params).await,

            // Resources
            "resources/list" => Ok(json!({ "resources": [] })),
            "resources/templates" | "resources/templates/list" => self.handle_resource_templates(),

            _ => Err(McpError::MethodNotFound(method.to_string())),
        }
    }

    /// Handle one raw JSON-RPC message.
    ///
    /// Returns `None` for notifications, which get no response.
    pub async fn handle_message(&self, message: Value) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    McpError::InvalidRequest(e.to_string()).into(),
                ))
            }
        };

        let id = request.id.clone().unwrap_or(Value::Null);
        if request.jsonrpc.as_deref() != Some("2.0") {
            return Some(JsonRpcResponse::error(
                id,
                McpError::InvalidRequest("jsonrpc must be \"2.0\"".to_string()).into(),
            ));
        }
        let Some(method) = request.method.as_deref() else {
            return Some(JsonRpcResponse::error(
                id,
                McpError::InvalidRequest("missing method".to_string()).into(),
            ));
        };

        let result = self.handle(method, request.params.clone()).await;

        if request.is_notification() {
            if let Err(e) = result {
                tracing::warn!(method = %method, error = %e, "Notification failed");
            }
            return None;
        }

        Some(match result {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, e.into()),
        })
    }

    /// Handle one message given as text. Invalid JSON is answered with `-32700`.
    pub async fn handle_text(&self, text: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<Value>(text) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => Some(JsonRpcResponse::error(
                Value::Null,
                McpError::ParseError(e.to_string()).into(),
            )),
        }
    }

    fn handle_initialize(&self, params: Value) -> Result<Value, McpError> {
        let client = params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let requested = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or("unspecified");
        tracing::info!(client = %client, requested_version = %requested, "MCP initialize request");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: self.capabilities(),
            server_info: self.server_info.clone(),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn handle_tools_list(&self) -> Result<Value, McpError> {
        let result = ToolsListResult {
            tools: self.registry.list_tools(),
        };
        Ok(serde_json::to_value(result)?)
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let params: CallToolParams = serde_json::from_value(params)?;
        let started = Instant::now();

        let output = self
            .registry
            .invoke(&params.name, params.arguments.unwrap_or_default())
            .await;

        match output {
            Ok(value) => {
                tracing::info!(
                    tool = %params.name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Tool call succeeded"
                );
                let result = CallToolResult::json(&value)
                    .map_err(|e| McpError::Internal(e.to_string()))?;
                serde_json::to_value(result).map_err(|e| McpError::Internal(e.to_string()))
            }
            Err(e) => {
                tracing::warn!(
                    tool = %params.name,
                    kind = e.kind(),
                    error = %e,
                    "Tool call failed"
                );
                Err(McpError::Tool(e))
            }
        }
    }

    fn handle_resource_templates(&self) -> Result<Value, McpError> {
        let templates: Vec<ResourceTemplate> = self
            .registry
            .list_tools()
            .iter()
            .map(ResourceTemplate::for_tool)
            .collect();
        Ok(json!({ "resourceTemplates": templates }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_registry;
    use crate::client::GhlClient;
    use crate::testing::StubUpstream;
    use axum::http::StatusCode;

    async fn interface(upstream: &StubUpstream) -> McpInterface {
        let client = Arc::new(GhlClient::new(upstream.api_config()).unwrap());
        McpInterface::new(Arc::new(build_registry(client, &[]).unwrap()))
    }

    async fn request(mcp: &McpInterface, message: Value) -> Value {
        let response = mcp.handle_message(message).await.unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_always_answers_fixed_version() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        for params in [
            json!({"protocolVersion": "2025-03-26", "clientInfo": {"name": "c", "version": "1"}}),
            json!({}),
            Value::Null,
        ] {
            let response = request(
                &mcp,
                json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": params}),
            )
            .await;
            assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
            assert_eq!(response["result"]["serverInfo"]["name"], "ghl-mcp-server");
            assert!(response["result"]["capabilities"]["tools"].is_object());
            assert!(response["result"]["capabilities"]["resources"].is_object());
        }
    }

    #[tokio::test]
    async fn test_tools_list_matches_registry() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        let response = request(&mcp, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), mcp.registry().tool_count());
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn test_tools_call_returns_pretty_text() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({"contact": {"id": "c1"}})).await;
        let mcp = interface(&upstream).await;

        let response = request(
            &mcp,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "create_contact", "arguments": {"firstName": "A"}}
            }),
        )
        .await;
        assert_eq!(
            response,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"content": [{"type": "text", "text": "{\n  \"contact\": {\n    \"id\": \"c1\"\n  }\n}"}]}
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found_class() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        let response = request(
            &mcp,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {"name": "nope"}}),
        )
        .await;
        assert_eq!(response["error"]["code"], -32603);
        assert_eq!(response["error"]["data"]["kind"], "tool_not_found");
        assert!(upstream.requests().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_reports_status() {
        let upstream =
            StubUpstream::spawn(StatusCode::UNPROCESSABLE_ENTITY, json!({"message": ["bad email"]}))
                .await;
        let mcp = interface(&upstream).await;

        let response = request(
            &mcp,
            json!({
                "jsonrpc": "2.0",
                "id": 6,
                "method": "tools/call",
                "params": {"name": "create_contact", "arguments": {"email": "x"}}
            }),
        )
        .await;
        assert_eq!(response["error"]["code"], -32603);
        assert_eq!(response["error"]["data"]["kind"], "upstream");
        assert_eq!(response["error"]["data"]["status"], 422);
        assert!(response["error"]["message"].as_str().unwrap().contains("bad email"));
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        let response = request(
            &mcp,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": {"name": "get_contact", "arguments": {}}
            }),
        )
        .await;
        assert_eq!(response["error"]["data"]["kind"], "invalid_arguments");
    }

    #[tokio::test]
    async fn test_envelope_validation() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        let response = request(&mcp, json!({"jsonrpc": "1.0", "id": 1, "method": "ping"})).await;
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], 1);

        let response = request(&mcp, json!({"jsonrpc": "2.0", "id": 2})).await;
        assert_eq!(response["error"]["code"], -32600);

        let response = request(&mcp, json!([1, 2])).await;
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], Value::Null);

        let response = mcp.handle_text("{not json").await.unwrap();
        assert_eq!(response.error.unwrap().code, -32700);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        let response = request(&mcp, json!({"jsonrpc": "2.0", "id": 1, "method": "prompts/list"})).await;
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_notifications_have_no_response() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        for method in ["notifications/initialized", "notifications/cancelled"] {
            assert!(mcp
                .handle_message(json!({"jsonrpc": "2.0", "method": method}))
                .await
                .is_none());
        }

        // Sent with an id, a notification is acknowledged with an empty result
        let response = request(
            &mcp,
            json!({"jsonrpc": "2.0", "id": 9, "method": "notifications/initialized"}),
        )
        .await;
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn test_null_id_gets_a_response() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({"ok": true})).await;
        let mcp = interface(&upstream).await;

        let response = mcp
            .handle_message(json!({
                "jsonrpc": "2.0",
                "id": null,
                "method": "tools/call",
                "params": {"name": "get_contact", "arguments": {"contactId": "c1"}}
            }))
            .await
            .expect("a null id is answered");
        assert_eq!(response.id, Value::Null);
        assert!(response.result.is_some());
        assert_eq!(upstream.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_resources() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        let response = request(&mcp, json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"})).await;
        assert_eq!(response["result"], json!({"resources": []}));

        for method in ["resources/templates", "resources/templates/list"] {
            let response = request(&mcp, json!({"jsonrpc": "2.0", "id": 1, "method": method})).await;
            let templates = response["result"]["resourceTemplates"].as_array().unwrap();
            assert_eq!(templates.len(), mcp.registry().tool_count());
            assert!(templates
                .iter()
                .any(|t| t["uriTemplate"] == "ghl://tools/create_contact"));
        }
    }

    #[tokio::test]
    async fn test_ping() {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({})).await;
        let mcp = interface(&upstream).await;

        let response = request(&mcp, json!({"jsonrpc": "2.0", "id": "p", "method": "ping"})).await;
        assert_eq!(response, json!({"jsonrpc": "2.0", "id": "p", "result": {}}));
    }
}
