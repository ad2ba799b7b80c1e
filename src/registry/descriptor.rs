use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A tool as advertised to MCP clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Describe a tool whose arguments deserialize into `P`
    pub fn new<P: JsonSchema>(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: input_schema_for::<P>(),
        }
    }
}

/// Generate an MCP `inputSchema` from a parameter type.
///
/// MCP requires `"type": "object"` at the schema root. The `$schema` and
/// `title` keys schemars adds are dropped since clients never use them.
pub fn input_schema_for<P: JsonSchema>() -> Value {
    let schema = schemars::schema_for!(P);
    let mut obj = match serde_json::to_value(schema) {
        Ok(Value::Object(obj)) => obj,
        _ => Map::new(),
    };

    obj.remove("$schema");
    obj.remove("title");
    obj.entry("type").or_insert_with(|| json!("object"));
    obj.entry("properties").or_insert_with(|| json!({}));

    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Arguments for a sample tool
    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    #[allow(dead_code)]
    struct SampleParams {
        /// Contact to look up
        contact_id: String,
        page_limit: Option<u32>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct NoParams {}

    #[test]
    fn test_schema_is_object_with_required_fields() {
        let schema = input_schema_for::<SampleParams>();
        assert_eq!(schema["type"], "object");
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("title").is_none());
        assert_eq!(schema["properties"]["contactId"]["type"], "string");
        assert_eq!(schema["properties"]["contactId"]["description"], "Contact to look up");
        assert_eq!(schema["required"], json!(["contactId"]));
    }

    #[test]
    fn test_empty_params_still_have_properties() {
        let schema = input_schema_for::<NoParams>();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"].is_object());
    }

    #[test]
    fn test_descriptor_serializes_camel_case() {
        let descriptor = ToolDescriptor::new::<NoParams>("get_workflows", "List workflows");
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["name"], "get_workflows");
        assert!(value["inputSchema"].is_object());
    }
}
