//! Media library tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::location_alt_type;
use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaFilesParams {
    /// Owner id (defaults to the configured location)
    pub alt_id: Option<String>,
    /// Owner type (default location)
    #[serde(default = "location_alt_type")]
    pub alt_type: String,
    /// createdAt, updatedAt or name (default createdAt)
    pub sort_by: Option<String>,
    /// asc or desc (default desc)
    pub sort_order: Option<String>,
    /// file or folder (default file)
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    /// Search by file name
    pub query: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Folder to list
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMediaParams {
    /// Public URL of the file to import
    pub file_url: String,
    /// File name shown in the library
    pub name: Option<String>,
    /// Folder to upload into
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMediaParams {
    /// File or folder id
    #[serde(skip_serializing)]
    pub media_id: String,
    /// Owner id (defaults to the configured location)
    pub alt_id: Option<String>,
    /// Owner type (default location)
    #[serde(default = "location_alt_type")]
    pub alt_type: String,
}

pub struct MediaTools {
    client: Arc<GhlClient>,
}

impl MediaTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for MediaTools {
    fn namespace(&self) -> &str {
        "media"
    }

    fn description(&self) -> &str {
        "List, upload and delete media library files"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<MediaFilesParams>("get_media_files", "List files in the media library"),
            ToolDescriptor::new::<UploadMediaParams>(
                "upload_media_file",
                "Import a publicly hosted file into the media library",
            ),
            ToolDescriptor::new::<DeleteMediaParams>("delete_media_file", "Delete a media file or folder"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "get_media_files" => {
                let mut p: MediaFilesParams = parse_args(args)?;
                p.alt_id = Some(client.location_or_default(p.alt_id.take()));
                p.sort_by.get_or_insert_with(|| "createdAt".to_string());
                p.sort_order.get_or_insert_with(|| "desc".to_string());
                p.file_type.get_or_insert_with(|| "file".to_string());
                Ok(client.get("/medias/files").query(&p)?.send().await?)
            }
            "upload_media_file" => {
                let p: UploadMediaParams = parse_args(args)?;
                let mut fields = vec![
                    ("hosted".to_string(), "true".to_string()),
                    ("fileUrl".to_string(), p.file_url),
                ];
                if let Some(name) = p.name {
                    fields.push(("name".to_string(), name));
                }
                if let Some(parent) = p.parent_id {
                    fields.push(("parentId".to_string(), parent));
                }
                Ok(client
                    .post("/medias/upload-file")
                    .multipart(fields)
                    .send()
                    .await?)
            }
            "delete_media_file" => {
                let mut p: DeleteMediaParams = parse_args(args)?;
                p.alt_id = Some(client.location_or_default(p.alt_id.take()));
                Ok(client
                    .delete(format!("/medias/{}", seg(&p.media_id)))
                    .query(&p)?
                    .send()
                    .await?)
            }
            _ => Err(ToolError::UnknownTool(tool.to_string())),
        }
    }
}
