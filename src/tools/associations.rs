//! Association and relation tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListAssociationsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Number to skip (default 0)
    pub skip: Option<u32>,
    /// Maximum results (default 20)
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssociationParams {
    /// Unique association key
    pub key: String,
    /// Label of the first object's side
    pub first_object_label: String,
    /// First object key, e.g. contact
    pub first_object_key: String,
    pub second_object_label: String,
    /// Second object key, e.g. custom_objects.pets
    pub second_object_key: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociationIdParams {
    /// Association id
    pub association_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelationParams {
    /// Association the relation belongs to
    pub association_id: String,
    /// Record on the first object's side
    pub first_record_id: String,
    /// Record on the second object's side
    pub second_record_id: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordRelationsParams {
    /// Record whose relations to list
    #[serde(skip_serializing)]
    pub record_id: String,
    /// Only relations of these associations
    pub association_ids: Option<Vec<String>>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRelationParams {
    /// Relation id
    #[serde(skip_serializing)]
    pub relation_id: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

pub struct AssociationTools {
    client: Arc<GhlClient>,
}

impl AssociationTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for AssociationTools {
    fn namespace(&self) -> &str {
        "associations"
    }

    fn description(&self) -> &str {
        "Define associations between objects and relate their records"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<ListAssociationsParams>("get_all_associations", "List associations"),
            ToolDescriptor::new::<CreateAssociationParams>(
                "create_association",
                "Define an association between two objects",
            ),
            ToolDescriptor::new::<AssociationIdParams>("get_association", "Get an association by id"),
            ToolDescriptor::new::<AssociationIdParams>("delete_association", "Delete an association"),
            ToolDescriptor::new::<CreateRelationParams>("create_relation", "Relate two records"),
            ToolDescriptor::new::<RecordRelationsParams>(
                "get_relations_by_record",
                "List the relations of a record",
            ),
            ToolDescriptor::new::<DeleteRelationParams>("delete_relation", "Remove a relation"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let request = match tool {
            "get_all_associations" => {
                let mut p: ListAssociationsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.skip = Some(p.skip.unwrap_or(0));
                p.limit = Some(p.limit.unwrap_or(20));
                client.get("/associations/").query(&p)?
            }
            "create_association" => {
                let mut p: CreateAssociationParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.post("/associations/").json(&p)?
            }
            "get_association" => {
                let p: AssociationIdParams = parse_args(args)?;
                client.get(format!("/associations/{}", seg(&p.association_id)))
            }
            "delete_association" => {
                let p: AssociationIdParams = parse_args(args)?;
                client.delete(format!("/associations/{}", seg(&p.association_id)))
            }
            "create_relation" => {
                let mut p: CreateRelationParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.post("/associations/relations").json(&p)?
            }
            "get_relations_by_record" => {
                let mut p: RecordRelationsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                p.skip = Some(p.skip.unwrap_or(0));
                p.limit = Some(p.limit.unwrap_or(20));
                client
                    .get(format!("/associations/relations/{}", seg(&p.record_id)))
                    .query(&p)?
            }
            "delete_relation" => {
                let mut p: DeleteRelationParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client
                    .delete(format!("/associations/relations/{}", seg(&p.relation_id)))
                    .query(&p)?
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };
        Ok(request.send().await?)
    }
}
