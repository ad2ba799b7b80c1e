//! Opportunity and pipeline tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchOpportunitiesParams {
    /// Free text search
    pub q: Option<String>,
    pub pipeline_id: Option<String>,
    pub pipeline_stage_id: Option<String>,
    pub contact_id: Option<String>,
    /// open, won, lost, abandoned or all
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    /// Maximum results (default 20)
    pub limit: Option<u32>,
    pub page: Option<u32>,
    /// Location id (defaults to the configured location)
    #[serde(rename = "location_id")]
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelinesParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityIdParams {
    /// Opportunity id
    pub opportunity_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunityParams {
    pub name: String,
    pub pipeline_id: String,
    /// Contact the opportunity is for
    pub contact_id: String,
    pub pipeline_stage_id: Option<String>,
    /// open, won, lost or abandoned (default open)
    pub status: Option<String>,
    pub monetary_value: Option<f64>,
    pub assigned_to: Option<String>,
    pub custom_fields: Option<Vec<Value>>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpportunityParams {
    /// Opportunity id
    #[serde(skip_serializing)]
    pub opportunity_id: String,
    pub name: Option<String>,
    pub pipeline_id: Option<String>,
    pub pipeline_stage_id: Option<String>,
    pub status: Option<String>,
    pub monetary_value: Option<f64>,
    pub assigned_to: Option<String>,
    pub custom_fields: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityStatusParams {
    /// Opportunity id
    #[serde(skip_serializing)]
    pub opportunity_id: String,
    /// open, won, lost or abandoned
    pub status: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertOpportunityParams {
    pub pipeline_id: String,
    pub contact_id: String,
    pub name: Option<String>,
    pub pipeline_stage_id: Option<String>,
    pub status: Option<String>,
    pub monetary_value: Option<f64>,
    pub assigned_to: Option<String>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

pub struct OpportunityTools {
    client: Arc<GhlClient>,
}

impl OpportunityTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for OpportunityTools {
    fn namespace(&self) -> &str {
        "opportunities"
    }

    fn description(&self) -> &str {
        "Search and manage sales opportunities and pipelines"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<SearchOpportunitiesParams>(
                "search_opportunities",
                "Search opportunities by pipeline, stage, status or contact",
            ),
            ToolDescriptor::new::<PipelinesParams>("get_pipelines", "List sales pipelines and their stages"),
            ToolDescriptor::new::<OpportunityIdParams>("get_opportunity", "Get an opportunity by id"),
            ToolDescriptor::new::<CreateOpportunityParams>("create_opportunity", "Create an opportunity"),
            ToolDescriptor::new::<UpdateOpportunityParams>("update_opportunity", "Update an opportunity"),
            ToolDescriptor::new::<OpportunityStatusParams>(
                "update_opportunity_status",
                "Mark an opportunity open, won, lost or abandoned",
            ),
            ToolDescriptor::new::<UpsertOpportunityParams>(
                "upsert_opportunity",
                "Create an opportunity or update the contact's existing one in the pipeline",
            ),
            ToolDescriptor::new::<OpportunityIdParams>("delete_opportunity", "Delete an opportunity"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "search_opportunities" => {
                let mut p: SearchOpportunitiesParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.limit = Some(p.limit.unwrap_or(20));
                Ok(client.get("/opportunities/search").query(&p)?.send().await?)
            }
            "get_pipelines" => {
                let p: PipelinesParams = parse_args(args)?;
                Ok(client
                    .get("/opportunities/pipelines")
                    .param("locationId", client.location_or_default(p.location_id))
                    .send()
                    .await?)
            }
            "get_opportunity" | "delete_opportunity" => {
                let p: OpportunityIdParams = parse_args(args)?;
                let path = format!("/opportunities/{}", seg(&p.opportunity_id));
                let request = if tool == "get_opportunity" {
                    client.get(path)
                } else {
                    client.delete(path)
                };
                Ok(request.send().await?)
            }
            "create_opportunity" => {
                let mut p: CreateOpportunityParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.status.get_or_insert_with(|| "open".to_string());
                Ok(client.post("/opportunities/").json(&p)?.send().await?)
            }
            "update_opportunity" => {
                let p: UpdateOpportunityParams = parse_args(args)?;
                Ok(client
                    .put(format!("/opportunities/{}", seg(&p.opportunity_id)))
                    .json(&p)?
                    .send()
                    .await?)
            }
            "update_opportunity_status" => {
                let p: OpportunityStatusParams = parse_args(args)?;
                Ok(client
                    .put(format!("/opportunities/{}/status", seg(&p.opportunity_id)))
                    .json(&p)?
                    .send()
                    .await?)
            }
            "upsert_opportunity" => {
                let mut p: UpsertOpportunityParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client.post("/opportunities/upsert").json(&p)?.send().await?)
            }
            _ => Err(ToolError::UnknownTool(tool.to_string())),
        }
    }
}
