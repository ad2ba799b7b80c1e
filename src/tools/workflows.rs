//! Workflow tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactWorkflowParams {
    /// Contact id
    #[serde(skip_serializing)]
    pub contact_id: String,
    /// Workflow id
    #[serde(skip_serializing)]
    pub workflow_id: String,
    /// Start time for the contact in the workflow, ISO 8601
    pub event_start_time: Option<String>,
}

pub struct WorkflowTools {
    client: Arc<GhlClient>,
}

impl WorkflowTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for WorkflowTools {
    fn namespace(&self) -> &str {
        "workflows"
    }

    fn description(&self) -> &str {
        "List workflows and enrol or remove contacts"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<WorkflowsParams>("get_workflows", "List the workflows of a location"),
            ToolDescriptor::new::<ContactWorkflowParams>(
                "add_contact_to_workflow",
                "Enrol a contact in a workflow",
            ),
            ToolDescriptor::new::<ContactWorkflowParams>(
                "remove_contact_from_workflow",
                "Remove a contact from a workflow",
            ),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "get_workflows" => {
                let p: WorkflowsParams = parse_args(args)?;
                Ok(client
                    .get("/workflows/")
                    .param("locationId", client.location_or_default(p.location_id))
                    .send()
                    .await?)
            }
            "add_contact_to_workflow" | "remove_contact_from_workflow" => {
                let p: ContactWorkflowParams = parse_args(args)?;
                let path = format!(
                    "/contacts/{}/workflow/{}",
                    seg(&p.contact_id),
                    seg(&p.workflow_id)
                );
                let request = if tool == "add_contact_to_workflow" {
                    client.post(path)
                } else {
                    client.delete(path)
                };
                Ok(request.json(&p)?.send().await?)
            }
            _ => Err(ToolError::UnknownTool(tool.to_string())),
        }
    }
}
