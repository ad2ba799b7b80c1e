//! Store tools: shipping zones, carriers and settings

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::location_alt_type;
use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

/// Store owner, sent with every store request
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreOwner {
    /// Owner id (defaults to the configured location)
    pub alt_id: Option<String>,
    /// Owner type (default location)
    #[serde(default = "location_alt_type")]
    pub alt_type: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListZonesParams {
    #[serde(flatten)]
    pub owner: StoreOwner,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Include shipping rates of each zone
    pub with_shipping_rate: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateZoneParams {
    #[serde(flatten)]
    pub owner: StoreOwner,
    /// Zone name
    pub name: String,
    /// Countries covered: [{"code": "US", "states": [{"code": "CA"}]}]
    pub countries: Vec<Value>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoneIdParams {
    /// Shipping zone id
    #[serde(skip_serializing)]
    pub shipping_zone_id: String,
    #[serde(flatten)]
    pub owner: StoreOwner,
}

pub struct StoreTools {
    client: Arc<GhlClient>,
}

impl StoreTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }

    fn fill(&self, owner: &mut StoreOwner) {
        owner.alt_id = Some(self.client.location_or_default(owner.alt_id.take()));
    }
}

#[async_trait]
impl ToolModule for StoreTools {
    fn namespace(&self) -> &str {
        "store"
    }

    fn description(&self) -> &str {
        "Manage store shipping zones and read carriers and settings"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<ListZonesParams>("list_shipping_zones", "List shipping zones"),
            ToolDescriptor::new::<CreateZoneParams>("create_shipping_zone", "Create a shipping zone"),
            ToolDescriptor::new::<ZoneIdParams>("get_shipping_zone", "Get a shipping zone by id"),
            ToolDescriptor::new::<ZoneIdParams>("delete_shipping_zone", "Delete a shipping zone"),
            ToolDescriptor::new::<StoreOwner>("list_shipping_carriers", "List shipping carriers"),
            ToolDescriptor::new::<StoreOwner>("get_store_settings", "Get store settings"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let request = match tool {
            "list_shipping_zones" => {
                let mut p: ListZonesParams = parse_args(args)?;
                self.fill(&mut p.owner);
                client.get("/store/shipping-zone").query(&p)?
            }
            "create_shipping_zone" => {
                let mut p: CreateZoneParams = parse_args(args)?;
                self.fill(&mut p.owner);
                client.post("/store/shipping-zone").json(&p)?
            }
            "get_shipping_zone" | "delete_shipping_zone" => {
                let mut p: ZoneIdParams = parse_args(args)?;
                self.fill(&mut p.owner);
                let path = format!("/store/shipping-zone/{}", seg(&p.shipping_zone_id));
                let request = if tool == "get_shipping_zone" {
                    client.get(path)
                } else {
                    client.delete(path)
                };
                request.query(&p)?
            }
            "list_shipping_carriers" | "get_store_settings" => {
                let mut owner: StoreOwner = parse_args(args)?;
                self.fill(&mut owner);
                let path = if tool == "list_shipping_carriers" {
                    "/store/shipping-carrier"
                } else {
                    "/store/store-setting"
                };
                client.get(path).query(&owner)?
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };
        Ok(request.send().await?)
    }
}
