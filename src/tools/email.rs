//! Email marketing tools: campaigns and builder templates

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// active, pause or complete
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplatesParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Search by template name
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateParams {
    /// Template title
    pub title: Option<String>,
    /// html or builder (default html)
    #[serde(rename = "type")]
    pub template_type: Option<String>,
    /// HTML content
    pub html: Option<String>,
    /// Copy an existing template
    pub template_id: Option<String>,
    #[serde(default)]
    pub is_plain_text: bool,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateParams {
    /// Template id
    pub template_id: String,
    /// HTML content
    pub html: String,
    /// Previewer image URL
    pub preview_url: Option<String>,
    /// Builder data version
    pub editor_type: Option<String>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTemplateParams {
    /// Template id
    pub template_id: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

pub struct EmailTools {
    client: Arc<GhlClient>,
}

impl EmailTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for EmailTools {
    fn namespace(&self) -> &str {
        "email"
    }

    fn description(&self) -> &str {
        "List email campaigns and manage email builder templates"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<CampaignsParams>("get_email_campaigns", "List scheduled email campaigns"),
            ToolDescriptor::new::<TemplatesParams>("get_email_templates", "List email templates"),
            ToolDescriptor::new::<CreateTemplateParams>("create_email_template", "Create an email template"),
            ToolDescriptor::new::<UpdateTemplateParams>(
                "update_email_template",
                "Replace the content of an email template",
            ),
            ToolDescriptor::new::<DeleteTemplateParams>("delete_email_template", "Delete an email template"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "get_email_campaigns" => {
                let mut p: CampaignsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client.get("/emails/schedule").query(&p)?.send().await?)
            }
            "get_email_templates" => {
                let mut p: TemplatesParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client.get("/emails/builder").query(&p)?.send().await?)
            }
            "create_email_template" => {
                let mut p: CreateTemplateParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.template_type.get_or_insert_with(|| "html".to_string());
                Ok(client.post("/emails/builder").json(&p)?.send().await?)
            }
            "update_email_template" => {
                let mut p: UpdateTemplateParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.editor_type.get_or_insert_with(|| "html".to_string());
                Ok(client.post("/emails/builder/data").json(&p)?.send().await?)
            }
            "delete_email_template" => {
                let p: DeleteTemplateParams = parse_args(args)?;
                let location = client.location_or_default(p.location_id);
                Ok(client
                    .delete(format!(
                        "/emails/builder/{}/{}",
                        seg(&location),
                        seg(&p.template_id)
                    ))
                    .send()
                    .await?)
            }
            _ => Err(ToolError::UnknownTool(tool.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::call_ok;
    use serde_json::json;

    #[tokio::test]
    async fn test_delete_template_path_includes_location() {
        let req = call_ok(
            EmailTools::new,
            "delete_email_template",
            json!({"templateId": "t1"}),
        )
        .await;
        assert_eq!(req.method, "DELETE");
        assert_eq!(req.path, "/emails/builder/test-location/t1");
    }

    #[tokio::test]
    async fn test_create_template_defaults() {
        let req = call_ok(
            EmailTools::new,
            "create_email_template",
            json!({"title": "Welcome", "html": "<p>Hi</p>"}),
        )
        .await;
        assert_eq!(
            req.json(),
            json!({
                "title": "Welcome",
                "type": "html",
                "html": "<p>Hi</p>",
                "isPlainText": false,
                "locationId": "test-location"
            })
        );
    }
}
