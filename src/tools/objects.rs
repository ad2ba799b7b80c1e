//! Custom object tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchemaParams {
    /// Object key, e.g. custom_objects.pets or contact
    #[serde(skip_serializing)]
    pub key: String,
    /// Include the object's fields
    pub fetch_properties: Option<bool>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordParams {
    /// Object key, e.g. custom_objects.pets
    #[serde(skip_serializing)]
    pub schema_key: String,
    /// Field values keyed by field key
    pub properties: Value,
    /// Owner user ids
    pub owner: Option<Vec<String>>,
    /// Follower user ids
    pub followers: Option<Vec<String>>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordIdParams {
    /// Object key, e.g. custom_objects.pets
    pub schema_key: String,
    /// Record id
    pub record_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordParams {
    /// Object key, e.g. custom_objects.pets
    #[serde(skip_serializing)]
    pub schema_key: String,
    /// Record id
    #[serde(skip_serializing)]
    pub record_id: String,
    /// Field values to change, keyed by field key
    pub properties: Option<Value>,
    pub owner: Option<Vec<String>>,
    pub followers: Option<Vec<String>>,
    /// Location id (defaults to the configured location)
    #[serde(skip_serializing)]
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecordsParams {
    /// Object key, e.g. custom_objects.pets
    #[serde(skip_serializing)]
    pub schema_key: String,
    /// Free text search over searchable fields
    pub query: Option<String>,
    /// Page number (default 1)
    pub page: Option<u32>,
    /// Page size (default 10)
    pub page_limit: Option<u32>,
    /// Cursor from a previous response
    pub search_after: Option<Vec<Value>>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

pub struct ObjectTools {
    client: Arc<GhlClient>,
}

impl ObjectTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

fn records_path(schema_key: &str) -> String {
    format!("/objects/{}/records", seg(schema_key))
}

#[async_trait]
impl ToolModule for ObjectTools {
    fn namespace(&self) -> &str {
        "objects"
    }

    fn description(&self) -> &str {
        "Read custom object schemas and manage their records"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<ObjectsParams>("get_all_objects", "List the objects of a location"),
            ToolDescriptor::new::<ObjectSchemaParams>("get_object_schema", "Get an object's schema"),
            ToolDescriptor::new::<CreateRecordParams>("create_object_record", "Create a record of an object"),
            ToolDescriptor::new::<RecordIdParams>("get_object_record", "Get an object record by id"),
            ToolDescriptor::new::<UpdateRecordParams>("update_object_record", "Update an object record"),
            ToolDescriptor::new::<RecordIdParams>("delete_object_record", "Delete an object record"),
            ToolDescriptor::new::<SearchRecordsParams>(
                "search_object_records",
                "Search the records of an object",
            ),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let request = match tool {
            "get_all_objects" => {
                let mut p: ObjectsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.get("/objects/").query(&p)?
            }
            "get_object_schema" => {
                let mut p: ObjectSchemaParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.get(format!("/objects/{}", seg(&p.key))).query(&p)?
            }
            "create_object_record" => {
                let mut p: CreateRecordParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.post(records_path(&p.schema_key)).json(&p)?
            }
            "get_object_record" | "delete_object_record" => {
                let p: RecordIdParams = parse_args(args)?;
                let path = format!("{}/{}", records_path(&p.schema_key), seg(&p.record_id));
                if tool == "get_object_record" {
                    client.get(path)
                } else {
                    client.delete(path)
                }
            }
            "update_object_record" => {
                let p: UpdateRecordParams = parse_args(args)?;
                let path = format!("{}/{}", records_path(&p.schema_key), seg(&p.record_id));
                client
                    .put(path)
                    .param("locationId", client.location_or_default(p.location_id.clone()))
                    .json(&p)?
            }
            "search_object_records" => {
                let mut p: SearchRecordsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.page = Some(p.page.unwrap_or(1));
                p.page_limit = Some(p.page_limit.unwrap_or(10));
                client
                    .post(format!("{}/search", records_path(&p.schema_key)))
                    .json(&p)?
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };
        Ok(request.send().await?)
    }
}
