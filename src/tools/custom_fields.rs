//! Custom field (v2) tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFieldParams {
    /// Object the field belongs to, e.g. custom_objects.pets
    pub object_key: String,
    /// Field name
    pub name: String,
    /// TEXT, LARGE_TEXT, NUMERICAL, PHONE, MONETORY, CHECKBOX, SINGLE_OPTIONS,
    /// MULTIPLE_OPTIONS, DATE, TEXTBOX_LIST, FILE_UPLOAD or RADIO
    pub data_type: String,
    /// Folder the field is placed in
    pub parent_id: String,
    /// Unique key, e.g. custom_objects.pets.breed
    pub field_key: String,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub show_in_forms: Option<bool>,
    /// Choices for option fields: [{"key": "...", "label": "..."}]
    pub options: Option<Vec<Value>>,
    pub accepted_formats: Option<String>,
    pub max_file_limit: Option<u32>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldIdParams {
    /// Custom field id
    pub field_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFieldParams {
    /// Custom field id
    #[serde(skip_serializing)]
    pub field_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub show_in_forms: Option<bool>,
    pub options: Option<Vec<Value>>,
    pub accepted_formats: Option<String>,
    pub max_file_limit: Option<u32>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldsByObjectParams {
    /// Object key, e.g. custom_objects.pets
    #[serde(skip_serializing)]
    pub object_key: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderParams {
    /// Object the folder belongs to
    pub object_key: String,
    /// Folder name
    pub name: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

pub struct CustomFieldTools {
    client: Arc<GhlClient>,
}

impl CustomFieldTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for CustomFieldTools {
    fn namespace(&self) -> &str {
        "custom_fields"
    }

    fn description(&self) -> &str {
        "Manage custom fields and folders of objects"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<CreateFieldParams>("create_custom_field", "Create a custom field"),
            ToolDescriptor::new::<FieldIdParams>("get_custom_field", "Get a custom field or folder by id"),
            ToolDescriptor::new::<UpdateFieldParams>("update_custom_field", "Update a custom field"),
            ToolDescriptor::new::<FieldIdParams>("delete_custom_field", "Delete a custom field"),
            ToolDescriptor::new::<FieldsByObjectParams>(
                "get_custom_fields_by_object",
                "List the custom fields and folders of an object",
            ),
            ToolDescriptor::new::<CreateFolderParams>(
                "create_custom_field_folder",
                "Create a custom field folder",
            ),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "create_custom_field" => {
                let mut p: CreateFieldParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client.post("/custom-fields/").json(&p)?.send().await?)
            }
            "get_custom_field" => {
                let p: FieldIdParams = parse_args(args)?;
                Ok(client
                    .get(format!("/custom-fields/{}", seg(&p.field_id)))
                    .send()
                    .await?)
            }
            "update_custom_field" => {
                let mut p: UpdateFieldParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client
                    .put(format!("/custom-fields/{}", seg(&p.field_id)))
                    .json(&p)?
                    .send()
                    .await?)
            }
            "delete_custom_field" => {
                let p: FieldIdParams = parse_args(args)?;
                Ok(client
                    .delete(format!("/custom-fields/{}", seg(&p.field_id)))
                    .send()
                    .await?)
            }
            "get_custom_fields_by_object" => {
                let mut p: FieldsByObjectParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client
                    .get(format!("/custom-fields/object-key/{}", seg(&p.object_key)))
                    .query(&p)?
                    .send()
                    .await?)
            }
            "create_custom_field_folder" => {
                let mut p: CreateFolderParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client.post("/custom-fields/folder").json(&p)?.send().await?)
            }
            _ => Err(ToolError::UnknownTool(tool.to_string())),
        }
    }
}
