//! MCP protocol types (2024-11-05)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::JsonRpcError;
use crate::registry::ToolDescriptor;

/// Protocol version answered to every `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "ghl-mcp-server";

/// Incoming JSON-RPC message
///
/// `jsonrpc` and `method` are optional here so that malformed envelopes can be
/// answered with `-32600` instead of a parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Absent for notifications. An explicit `null` id is still a request.
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Value,
}

/// Keeps a present `"id": null` as `Some(Value::Null)`; only a missing key is `None`
fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outgoing JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    pub subscribe: bool,
    pub list_changed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
    pub resources: ResourcesCapability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDescriptor>,
}

/// `tools/call` parameters
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
}

impl CallToolResult {
    /// Single text item holding `value` as 2-space indented JSON
    pub fn json(value: &Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content: vec![Content::Text {
                text: serde_json::to_string_pretty(value)?,
            }],
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    pub uri_template: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

impl ResourceTemplate {
    pub fn for_tool(tool: &ToolDescriptor) -> Self {
        Self {
            uri_template: format!("ghl://tools/{}", tool.name),
            name: tool.name.clone(),
            description: tool.description.clone(),
            mime_type: "application/json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_result_is_pretty_text() {
        let result = CallToolResult::json(&json!({"contact": {"id": "c1"}})).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"content": [{"type": "text", "text": "{\n  \"contact\": {\n    \"id\": \"c1\"\n  }\n}"}]})
        );
    }

    #[test]
    fn test_error_response_omits_result() {
        let response = JsonRpcResponse::error(
            json!(3),
            JsonRpcError {
                code: -32601,
                message: "Method not found: x".into(),
                data: None,
            },
        );
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"jsonrpc": "2.0", "id": 3, "error": {"code": -32601, "message": "Method not found: x"}})
        );
    }

    #[test]
    fn test_request_envelope_is_lenient() {
        let request: JsonRpcRequest = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(request.jsonrpc.is_none());
        assert!(request.method.is_none());
        assert!(!request.is_notification());
        assert_eq!(request.params, Value::Null);
    }

    #[test]
    fn test_null_id_is_a_request() {
        let request: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": null, "method": "ping"})).unwrap();
        assert_eq!(request.id, Some(Value::Null));
        assert!(!request.is_notification());

        let notification: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "ping"})).unwrap();
        assert!(notification.is_notification());
    }
}
