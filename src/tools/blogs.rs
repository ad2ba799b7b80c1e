//! Blog tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogSitesParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Number of sites to skip
    pub skip: Option<u32>,
    /// Maximum results (default 10)
    pub limit: Option<u32>,
    pub search_term: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostsParams {
    /// Blog site id
    pub blog_id: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Maximum results (default 10)
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub search_term: Option<String>,
    /// PUBLISHED, DRAFT, SCHEDULED or ARCHIVED
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostParams {
    /// Blog site id
    pub blog_id: String,
    pub title: String,
    /// HTML content of the post
    pub raw_html: String,
    pub description: String,
    /// Cover image URL
    pub image_url: String,
    pub image_alt_text: String,
    /// Category ids
    pub categories: Vec<String>,
    /// Author id
    pub author: String,
    /// URL slug, must be unique within the blog
    pub url_slug: String,
    pub tags: Option<Vec<String>>,
    /// PUBLISHED, DRAFT or SCHEDULED (default DRAFT)
    pub status: Option<String>,
    /// ISO 8601 publish time
    pub published_at: Option<String>,
    pub canonical_link: Option<String>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogPostParams {
    /// Post id
    #[serde(skip_serializing)]
    pub post_id: String,
    /// Blog site id
    pub blog_id: String,
    pub title: Option<String>,
    pub raw_html: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_alt_text: Option<String>,
    pub categories: Option<Vec<String>>,
    pub author: Option<String>,
    pub url_slug: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
    pub published_at: Option<String>,
    pub canonical_link: Option<String>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogListingParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Maximum results (default 10)
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlSlugParams {
    /// Slug to check
    pub url_slug: String,
    /// Post being edited, excluded from the check
    pub post_id: Option<String>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

pub struct BlogTools {
    client: Arc<GhlClient>,
}

impl BlogTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for BlogTools {
    fn namespace(&self) -> &str {
        "blogs"
    }

    fn description(&self) -> &str {
        "Manage blog sites, posts, authors and categories"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<BlogSitesParams>("get_blog_sites", "List blog sites in a location"),
            ToolDescriptor::new::<BlogPostsParams>("get_blog_posts", "List posts of a blog"),
            ToolDescriptor::new::<CreateBlogPostParams>("create_blog_post", "Create a blog post"),
            ToolDescriptor::new::<UpdateBlogPostParams>("update_blog_post", "Update a blog post"),
            ToolDescriptor::new::<BlogListingParams>("get_blog_authors", "List blog authors"),
            ToolDescriptor::new::<BlogListingParams>("get_blog_categories", "List blog categories"),
            ToolDescriptor::new::<UrlSlugParams>(
                "check_url_slug_exists",
                "Check whether a blog post URL slug is already taken",
            ),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let request = match tool {
            "get_blog_sites" => {
                let mut p: BlogSitesParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.skip = Some(p.skip.unwrap_or(0));
                p.limit = Some(p.limit.unwrap_or(10));
                client.get("/blogs/site/all").query(&p)?
            }
            "get_blog_posts" => {
                let mut p: BlogPostsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.limit = Some(p.limit.unwrap_or(10));
                p.offset = Some(p.offset.unwrap_or(0));
                client.get("/blogs/posts/all").query(&p)?
            }
            "create_blog_post" => {
                let mut p: CreateBlogPostParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.status.get_or_insert_with(|| "DRAFT".to_string());
                client.post("/blogs/posts").json(&p)?
            }
            "update_blog_post" => {
                let mut p: UpdateBlogPostParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.put(format!("/blogs/posts/{}", seg(&p.post_id))).json(&p)?
            }
            "get_blog_authors" | "get_blog_categories" => {
                let mut p: BlogListingParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.limit = Some(p.limit.unwrap_or(10));
                p.offset = Some(p.offset.unwrap_or(0));
                let path = if tool == "get_blog_authors" {
                    "/blogs/authors"
                } else {
                    "/blogs/categories"
                };
                client.get(path).query(&p)?
            }
            "check_url_slug_exists" => {
                let mut p: UrlSlugParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.get("/blogs/posts/url-slug-exists").query(&p)?
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };
        Ok(request.send().await?)
    }
}
