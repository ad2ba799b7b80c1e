//! Email verification

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::GhlClient;
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

/// What `verify` holds
#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerifyTarget {
    Email,
    Contact,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailParams {
    /// Email address, or contact id when `type` is `contact`
    pub verify: String,
    /// email (default) or contact
    #[serde(rename = "type", default = "default_target")]
    pub target: VerifyTarget,
    /// Location id (defaults to the configured location)
    #[serde(skip_serializing)]
    pub location_id: Option<String>,
}

fn default_target() -> VerifyTarget {
    VerifyTarget::Email
}

pub struct EmailIsvTools {
    client: Arc<GhlClient>,
}

impl EmailIsvTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for EmailIsvTools {
    fn namespace(&self) -> &str {
        "email_isv"
    }

    fn description(&self) -> &str {
        "Verify email deliverability"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![ToolDescriptor::new::<VerifyEmailParams>(
            "verify_email",
            "Check whether an email address (or a contact's email) is deliverable",
        )]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        match tool {
            "verify_email" => {
                let mut p: VerifyEmailParams = parse_args(args)?;
                let location = self.client.location_or_default(p.location_id.take());
                Ok(self
                    .client
                    .post("/email/verify")
                    .param("locationId", location)
                    .json(&p)?
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
    use crate::tools::test_support::{call, call_ok};
    use serde_json::json;

    #[tokio::test]
    async fn test_verify_email() {
        let req = call_ok(
            EmailIsvTools::new,
            "verify_email",
            json!({"verify": "ada@example.com"}),
        )
        .await;
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/email/verify");
        assert_eq!(req.query.as_deref(), Some("locationId=test-location"));
        assert_eq!(req.json(), json!({"verify": "ada@example.com", "type": "email"}));
    }

    #[tokio::test]
    async fn test_rejects_unknown_target() {
        let (result, _) = call(
            EmailIsvTools::new,
            "verify_email",
            json!({"verify": "x", "type": "phone"}),
        )
        .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
