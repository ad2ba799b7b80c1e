//! Social media planner tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPostsParams {
    /// Location id (defaults to the configured location)
    #[serde(skip_serializing)]
    pub location_id: Option<String>,
    /// all, in_review, deleted, draft, failed, in_progress, published or scheduled
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    /// Range start, ISO 8601
    pub from_date: Option<String>,
    /// Range end, ISO 8601
    pub to_date: Option<String>,
    /// Only posts to these account ids
    pub accounts: Option<String>,
    pub include_users: Option<bool>,
    pub skip: Option<u32>,
    /// Maximum results (default 10)
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostParams {
    /// Location id (defaults to the configured location)
    #[serde(skip_serializing)]
    pub location_id: Option<String>,
    /// Connected account ids to post to
    pub account_ids: Vec<String>,
    /// Post text
    pub summary: String,
    /// Media items: [{"url": "...", "type": "image/png"}]
    pub media: Option<Vec<Value>>,
    /// post, story or reel (default post)
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    /// draft, scheduled or published
    pub status: Option<String>,
    /// ISO 8601 time to publish at
    pub schedule_date: Option<String>,
    pub user_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostIdParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Post id
    pub post_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

pub struct SocialMediaTools {
    client: Arc<GhlClient>,
}

impl SocialMediaTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }

    fn base(&self, location: Option<String>) -> String {
        let location = self.client.location_or_default(location);
        format!("/social-media-posting/{}", seg(&location))
    }
}

#[async_trait]
impl ToolModule for SocialMediaTools {
    fn namespace(&self) -> &str {
        "social_media"
    }

    fn description(&self) -> &str {
        "Plan and publish social media posts"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<SearchPostsParams>("search_social_posts", "Search social media posts"),
            ToolDescriptor::new::<CreatePostParams>(
                "create_social_post",
                "Create, schedule or publish a social media post",
            ),
            ToolDescriptor::new::<PostIdParams>("get_social_post", "Get a social media post by id"),
            ToolDescriptor::new::<PostIdParams>("delete_social_post", "Delete a social media post"),
            ToolDescriptor::new::<AccountsParams>(
                "get_social_accounts",
                "List connected social media accounts",
            ),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "search_social_posts" => {
                let mut p: SearchPostsParams = parse_args(args)?;
                let path = format!("{}/posts/list", self.base(p.location_id.take()));
                p.limit = Some(p.limit.unwrap_or(10));
                p.skip = Some(p.skip.unwrap_or(0));
                Ok(client.post(path).json(&p)?.send().await?)
            }
            "create_social_post" => {
                let mut p: CreatePostParams = parse_args(args)?;
                if p.account_ids.is_empty() {
                    return Err(ToolError::InvalidArguments(
                        "accountIds must name at least one account".to_string(),
                    ));
                }
                let path = format!("{}/posts", self.base(p.location_id.take()));
                p.post_type.get_or_insert_with(|| "post".to_string());
                Ok(client.post(path).json(&p)?.send().await?)
            }
            "get_social_post" | "delete_social_post" => {
                let p: PostIdParams = parse_args(args)?;
                let path = format!("{}/posts/{}", self.base(p.location_id), seg(&p.post_id));
                let request = if tool == "get_social_post" {
                    client.get(path)
                } else {
                    client.delete(path)
                };
                Ok(request.send().await?)
            }
            "get_social_accounts" => {
                let p: AccountsParams = parse_args(args)?;
                let path = format!("{}/accounts", self.base(p.location_id));
                Ok(client.get(path).send().await?)
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
    async fn test_search_posts_is_post_under_location() {
        let req = call_ok(
            SocialMediaTools::new,
            "search_social_posts",
            json!({"type": "scheduled"}),
        )
        .await;
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/social-media-posting/test-location/posts/list");
        assert_eq!(req.json(), json!({"type": "scheduled", "skip": 0, "limit": 10}));
    }

    #[tokio::test]
    async fn test_create_post_requires_accounts() {
        let (result, requests) = call(
            SocialMediaTools::new,
            "create_social_post",
            json!({"accountIds": [], "summary": "hello"}),
        )
        .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_delete_post() {
        let req = call_ok(
            SocialMediaTools::new,
            "delete_social_post",
            json!({"postId": "p1", "locationId": "loc2"}),
        )
        .await;
        assert_eq!(req.method, "DELETE");
        assert_eq!(req.path, "/social-media-posting/loc2/posts/p1");
    }
}
