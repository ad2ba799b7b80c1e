//! Survey tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::GhlClient;
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveysParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    pub skip: Option<u32>,
    /// Maximum results (max 50)
    pub limit: Option<u32>,
    /// folder or survey
    #[serde(rename = "type")]
    pub survey_type: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Only submissions of this survey
    pub survey_id: Option<String>,
    /// Search by contact name or email
    pub q: Option<String>,
    /// Range start, YYYY-MM-DD
    pub start_at: Option<String>,
    /// Range end, YYYY-MM-DD
    pub end_at: Option<String>,
    pub page: Option<u32>,
    /// Maximum results (max 100)
    pub limit: Option<u32>,
}

pub struct SurveyTools {
    client: Arc<GhlClient>,
}

impl SurveyTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for SurveyTools {
    fn namespace(&self) -> &str {
        "surveys"
    }

    fn description(&self) -> &str {
        "List surveys and their submissions"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<SurveysParams>("get_surveys", "List surveys"),
            ToolDescriptor::new::<SubmissionsParams>("get_survey_submissions", "List survey submissions"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "get_surveys" => {
                let mut p: SurveysParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client.get("/surveys/").query(&p)?.send().await?)
            }
            "get_survey_submissions" => {
                let mut p: SubmissionsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client.get("/surveys/submissions").query(&p)?.send().await?)
            }
            _ => Err(ToolError::UnknownTool(tool.to_string())),
        }
    }
}
