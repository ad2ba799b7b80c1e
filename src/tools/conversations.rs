//! Conversation and messaging tools
//!
//! Every endpoint in this area requires the `2021-04-15` API version.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient, LEGACY_API_VERSION};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchConversationsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Only conversations with this contact
    pub contact_id: Option<String>,
    /// Free text search
    pub query: Option<String>,
    /// all, read, unread, starred or recents
    pub status: Option<String>,
    /// Maximum results (default 20)
    pub limit: Option<u32>,
    /// Conversation id to start after
    pub start_after_id: Option<String>,
    /// Only conversations assigned to this user
    pub assigned_to: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationIdParams {
    /// Conversation id
    pub conversation_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationParams {
    /// Contact the conversation belongs to
    pub contact_id: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConversationParams {
    /// Conversation id
    #[serde(skip_serializing)]
    pub conversation_id: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Number of unread messages
    pub unread_count: Option<u32>,
    pub starred: Option<bool>,
    /// Feedback object
    pub feedback: Option<Value>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessagesParams {
    /// Conversation id
    #[serde(skip_serializing)]
    pub conversation_id: String,
    /// Maximum messages (default 20)
    pub limit: Option<u32>,
    /// Message id to continue after
    pub last_message_id: Option<String>,
    /// Only messages of this type, e.g. TYPE_SMS
    #[serde(rename = "type")]
    pub message_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageIdParams {
    /// Message id
    pub message_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsParams {
    /// Recipient contact id
    pub contact_id: String,
    /// Message text
    pub message: String,
    /// Sending number, when the location has several
    pub from_number: Option<String>,
    /// Public URLs of attachments
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailParams {
    /// Recipient contact id
    pub contact_id: String,
    pub subject: String,
    /// HTML body
    pub html: Option<String>,
    /// Plain text body, used when `html` is absent
    pub message: Option<String>,
    /// Sender address
    pub email_from: Option<String>,
    pub email_cc: Option<Vec<String>>,
    pub email_bcc: Option<Vec<String>>,
    /// Public URLs of attachments
    pub attachments: Option<Vec<String>>,
}

/// Body of `POST /conversations/messages`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutboundMessage<'a, P: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(flatten)]
    params: &'a P,
}

pub struct ConversationTools {
    client: Arc<GhlClient>,
}

impl ConversationTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for ConversationTools {
    fn namespace(&self) -> &str {
        "conversations"
    }

    fn description(&self) -> &str {
        "Search conversations, read messages and send SMS or email"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<SearchConversationsParams>(
                "search_conversations",
                "Search conversations in a location",
            ),
            ToolDescriptor::new::<ConversationIdParams>("get_conversation", "Get a conversation by id"),
            ToolDescriptor::new::<CreateConversationParams>(
                "create_conversation",
                "Start a conversation with a contact",
            ),
            ToolDescriptor::new::<UpdateConversationParams>(
                "update_conversation",
                "Update a conversation's read/starred state",
            ),
            ToolDescriptor::new::<ConversationIdParams>("delete_conversation", "Delete a conversation"),
            ToolDescriptor::new::<ConversationMessagesParams>(
                "get_conversation_messages",
                "List messages in a conversation",
            ),
            ToolDescriptor::new::<MessageIdParams>("get_message", "Get a single message by id"),
            ToolDescriptor::new::<SendSmsParams>("send_sms", "Send an SMS to a contact"),
            ToolDescriptor::new::<SendEmailParams>("send_email", "Send an email to a contact"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let response = match tool {
            "search_conversations" => {
                let mut p: SearchConversationsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.limit = Some(p.limit.unwrap_or(20));
                client.get("/conversations/search").query(&p)?
            }
            "get_conversation" => {
                let p: ConversationIdParams = parse_args(args)?;
                client.get(format!("/conversations/{}", seg(&p.conversation_id)))
            }
            "create_conversation" => {
                let mut p: CreateConversationParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.post("/conversations/").json(&p)?
            }
            "update_conversation" => {
                let mut p: UpdateConversationParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client
                    .put(format!("/conversations/{}", seg(&p.conversation_id)))
                    .json(&p)?
            }
            "delete_conversation" => {
                let p: ConversationIdParams = parse_args(args)?;
                client.delete(format!("/conversations/{}", seg(&p.conversation_id)))
            }
            "get_conversation_messages" => {
                let p: ConversationMessagesParams = parse_args(args)?;
                client
                    .get(format!("/conversations/{}/messages", seg(&p.conversation_id)))
                    .query(&p)?
            }
            "get_message" => {
                let p: MessageIdParams = parse_args(args)?;
                client.get(format!("/conversations/messages/{}", seg(&p.message_id)))
            }
            "send_sms" => {
                let p: SendSmsParams = parse_args(args)?;
                client.post("/conversations/messages").json(&OutboundMessage {
                    kind: "SMS",
                    params: &p,
                })?
            }
            "send_email" => {
                let p: SendEmailParams = parse_args(args)?;
                if p.html.is_none() && p.message.is_none() {
                    return Err(ToolError::InvalidArguments(
                        "either html or message is required".to_string(),
                    ));
                }
                client.post("/conversations/messages").json(&OutboundMessage {
                    kind: "Email",
                    params: &p,
                })?
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };

        Ok(response.version(LEGACY_API_VERSION).send().await?)
    }
}
