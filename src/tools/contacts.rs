//! Contact management tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

/// Fields shared by contact create/update/upsert
#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Full name (used when first/last are not given)
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number in E.164 format, e.g. +15551234567
    pub phone: Option<String>,
    /// Tags to apply
    pub tags: Option<Vec<String>>,
    /// Lead source
    pub source: Option<String>,
    /// Company name
    pub company_name: Option<String>,
    /// Street address
    pub address1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    /// Two letter country code
    pub country: Option<String>,
    pub website: Option<String>,
    /// IANA timezone, e.g. America/New_York
    pub timezone: Option<String>,
    /// User the contact is assigned to
    pub assigned_to: Option<String>,
    /// Custom field values: [{"id": "...", "value": ...}]
    pub custom_fields: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactParams {
    #[serde(flatten)]
    pub fields: ContactFields,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchContactsParams {
    /// Free text matched against name, email, phone and company
    pub query: Option<String>,
    /// Maximum number of contacts to return (default 25)
    pub page_limit: Option<u32>,
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactIdParams {
    /// Contact id
    pub contact_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactParams {
    /// Contact id
    #[serde(skip_serializing)]
    pub contact_id: String,
    #[serde(flatten)]
    pub fields: ContactFields,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactTagsParams {
    /// Contact id
    #[serde(skip_serializing)]
    pub contact_id: String,
    /// Tags to add or remove
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteParams {
    /// Contact id
    #[serde(skip_serializing)]
    pub contact_id: String,
    /// Note text
    pub body: String,
    /// Author user id
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskParams {
    /// Contact id
    #[serde(skip_serializing)]
    pub contact_id: String,
    /// Task title
    pub title: String,
    /// Task details
    pub body: Option<String>,
    /// Due date (ISO 8601)
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
    /// User the task is assigned to
    pub assigned_to: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateContactParams {
    /// Email to check
    pub email: Option<String>,
    /// Phone number to check
    pub number: Option<String>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

/// Contact tools
pub struct ContactTools {
    client: Arc<GhlClient>,
}

impl ContactTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for ContactTools {
    fn namespace(&self) -> &str {
        "contacts"
    }

    fn description(&self) -> &str {
        "Create, search, update and tag contacts; manage their notes and tasks"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<CreateContactParams>("create_contact", "Create a new contact"),
            ToolDescriptor::new::<SearchContactsParams>(
                "search_contacts",
                "Search contacts by name, email, phone or company",
            ),
            ToolDescriptor::new::<ContactIdParams>("get_contact", "Get a contact by id"),
            ToolDescriptor::new::<UpdateContactParams>("update_contact", "Update an existing contact"),
            ToolDescriptor::new::<ContactIdParams>("delete_contact", "Delete a contact"),
            ToolDescriptor::new::<CreateContactParams>(
                "upsert_contact",
                "Create a contact or update the one matching its email/phone",
            ),
            ToolDescriptor::new::<ContactTagsParams>("add_contact_tags", "Add tags to a contact"),
            ToolDescriptor::new::<ContactTagsParams>(
                "remove_contact_tags",
                "Remove tags from a contact",
            ),
            ToolDescriptor::new::<ContactIdParams>("get_contact_notes", "List notes on a contact"),
            ToolDescriptor::new::<CreateNoteParams>("create_contact_note", "Add a note to a contact"),
            ToolDescriptor::new::<ContactIdParams>("get_contact_tasks", "List tasks on a contact"),
            ToolDescriptor::new::<CreateTaskParams>("create_contact_task", "Create a task on a contact"),
            ToolDescriptor::new::<DuplicateContactParams>(
                "get_duplicate_contact",
                "Find an existing contact with the given email or phone",
            ),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        match tool {
            "create_contact" | "upsert_contact" => {
                let mut p: CreateContactParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                let path = if tool == "create_contact" {
                    "/contacts/"
                } else {
                    "/contacts/upsert"
                };
                Ok(client.post(path).json(&p)?.send().await?)
            }
            "search_contacts" => {
                let mut p: SearchContactsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.page_limit = Some(p.page_limit.unwrap_or(25));
                Ok(client.post("/contacts/search").json(&p)?.send().await?)
            }
            "get_contact" => {
                let p: ContactIdParams = parse_args(args)?;
                Ok(client.get(format!("/contacts/{}", seg(&p.contact_id))).send().await?)
            }
            "update_contact" => {
                let p: UpdateContactParams = parse_args(args)?;
                Ok(client
                    .put(format!("/contacts/{}", seg(&p.contact_id)))
                    .json(&p)?
                    .send()
                    .await?)
            }
            "delete_contact" => {
                let p: ContactIdParams = parse_args(args)?;
                Ok(client.delete(format!("/contacts/{}", seg(&p.contact_id))).send().await?)
            }
            "add_contact_tags" | "remove_contact_tags" => {
                let p: ContactTagsParams = parse_args(args)?;
                let path = format!("/contacts/{}/tags", seg(&p.contact_id));
                let request = if tool == "add_contact_tags" {
                    client.post(path)
                } else {
                    client.delete(path)
                };
                Ok(request.json(&p)?.send().await?)
            }
            "get_contact_notes" => {
                let p: ContactIdParams = parse_args(args)?;
                Ok(client
                    .get(format!("/contacts/{}/notes", seg(&p.contact_id)))
                    .send()
                    .await?)
            }
            "create_contact_note" => {
                let p: CreateNoteParams = parse_args(args)?;
                Ok(client
                    .post(format!("/contacts/{}/notes", seg(&p.contact_id)))
                    .json(&p)?
                    .send()
                    .await?)
            }
            "get_contact_tasks" => {
                let p: ContactIdParams = parse_args(args)?;
                Ok(client
                    .get(format!("/contacts/{}/tasks", seg(&p.contact_id)))
                    .send()
                    .await?)
            }
            "create_contact_task" => {
                let p: CreateTaskParams = parse_args(args)?;
                Ok(client
                    .post(format!("/contacts/{}/tasks", seg(&p.contact_id)))
                    .json(&p)?
                    .send()
                    .await?)
            }
            "get_duplicate_contact" => {
                let mut p: DuplicateContactParams = parse_args(args)?;
                if p.email.is_none() && p.number.is_none() {
                    return Err(ToolError::InvalidArguments(
                        "either email or number is required".to_string(),
                    ));
                }
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                Ok(client.get("/contacts/search/duplicate").query(&p)?.send().await?)
            }
            _ => Err(ToolError::UnknownTool(tool.to_string())),
        }
    }
}
