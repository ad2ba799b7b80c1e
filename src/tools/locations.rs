//! Location (sub-account) tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchLocationsParams {
    /// Agency (company) id
    pub company_id: Option<String>,
    /// Match on location email
    pub email: Option<String>,
    /// Maximum results (default 10)
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    /// asc or desc
    pub order: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationIdParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagParams {
    /// Location id (defaults to the configured location)
    #[serde(skip_serializing)]
    pub location_id: Option<String>,
    /// Tag name
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTagParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Tag id
    pub tag_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationCustomFieldsParams {
    /// Location id (defaults to the configured location)
    #[serde(skip_serializing)]
    pub location_id: Option<String>,
    /// contact or opportunity (default all)
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchTasksParams {
    /// Location id (defaults to the configured location)
    #[serde(skip_serializing)]
    pub location_id: Option<String>,
    pub contact_id: Option<Vec<String>>,
    pub assigned_to: Option<Vec<String>>,
    /// Free text search
    pub query: Option<String>,
    pub completed: Option<bool>,
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

pub struct LocationTools {
    client: Arc<GhlClient>,
}

impl LocationTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }

    fn location_path(&self, location: Option<String>, suffix: &str) -> String {
        let location = self.client.location_or_default(location);
        format!("/locations/{}{}", seg(&location), suffix)
    }
}

#[async_trait]
impl ToolModule for LocationTools {
    fn namespace(&self) -> &str {
        "locations"
    }

    fn description(&self) -> &str {
        "Read locations and manage their tags, custom values and tasks"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<SearchLocationsParams>("search_locations", "Search locations of an agency"),
            ToolDescriptor::new::<LocationIdParams>("get_location", "Get location details"),
            ToolDescriptor::new::<LocationIdParams>("get_location_tags", "List the tags of a location"),
            ToolDescriptor::new::<CreateTagParams>("create_location_tag", "Create a tag in a location"),
            ToolDescriptor::new::<DeleteTagParams>("delete_location_tag", "Delete a tag from a location"),
            ToolDescriptor::new::<LocationIdParams>(
                "get_location_custom_values",
                "List the custom values of a location",
            ),
            ToolDescriptor::new::<LocationCustomFieldsParams>(
                "get_location_custom_fields",
                "List the custom fields of a location",
            ),
            ToolDescriptor::new::<SearchTasksParams>("search_location_tasks", "Search tasks in a location"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "search_locations" => {
                let mut p: SearchLocationsParams = parse_args(args)?;
                p.limit = Some(p.limit.unwrap_or(10));
                Ok(client.get("/locations/search").query(&p)?.send().await?)
            }
            "get_location" | "get_location_tags" | "get_location_custom_values" => {
                let p: LocationIdParams = parse_args(args)?;
                let suffix = match tool {
                    "get_location_tags" => "/tags",
                    "get_location_custom_values" => "/customValues",
                    _ => "",
                };
                Ok(client.get(self.location_path(p.location_id, suffix)).send().await?)
            }
            "create_location_tag" => {
                let mut p: CreateTagParams = parse_args(args)?;
                let path = self.location_path(p.location_id.take(), "/tags");
                Ok(client.post(path).json(&p)?.send().await?)
            }
            "delete_location_tag" => {
                let p: DeleteTagParams = parse_args(args)?;
                let path = self.location_path(p.location_id, &format!("/tags/{}", seg(&p.tag_id)));
                Ok(client.delete(path).send().await?)
            }
            "get_location_custom_fields" => {
                let mut p: LocationCustomFieldsParams = parse_args(args)?;
                let path = self.location_path(p.location_id.take(), "/customFields");
                Ok(client.get(path).query(&p)?.send().await?)
            }
            "search_location_tasks" => {
                let mut p: SearchTasksParams = parse_args(args)?;
                let path = self.location_path(p.location_id.take(), "/tasks/search");
                Ok(client.post(path).json(&p)?.send().await?)
            }
            _ => Err(ToolError::UnknownTool(tool.to_string())),
        }
    }
}
