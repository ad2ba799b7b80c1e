//! Product and price tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Search by product name
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductParams {
    pub name: String,
    /// DIGITAL, PHYSICAL, SERVICE or PHYSICAL/DIGITAL
    pub product_type: String,
    pub description: Option<String>,
    /// Image URL
    pub image: Option<String>,
    pub available_in_store: Option<bool>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdParams {
    /// Product id
    #[serde(skip_serializing)]
    pub product_id: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductParams {
    /// Product id
    #[serde(skip_serializing)]
    pub product_id: String,
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub available_in_store: Option<bool>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPricesParams {
    /// Product id
    #[serde(skip_serializing)]
    pub product_id: String,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePriceParams {
    /// Product id
    #[serde(skip_serializing)]
    pub product_id: String,
    /// Price name
    pub name: String,
    /// one_time or recurring
    #[serde(rename = "type")]
    pub price_type: String,
    /// ISO currency code, e.g. USD
    pub currency: String,
    /// Amount in the currency's major unit
    pub amount: f64,
    /// For recurring prices: {"interval": "month", "intervalCount": 1}
    pub recurring: Option<Value>,
    pub compare_at_price: Option<f64>,
    pub track_inventory: Option<bool>,
    pub available_quantity: Option<u32>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

pub struct ProductTools {
    client: Arc<GhlClient>,
}

impl ProductTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for ProductTools {
    fn namespace(&self) -> &str {
        "products"
    }

    fn description(&self) -> &str {
        "Manage products and their prices"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<ListProductsParams>("list_products", "List products"),
            ToolDescriptor::new::<CreateProductParams>("create_product", "Create a product"),
            ToolDescriptor::new::<ProductIdParams>("get_product", "Get a product by id"),
            ToolDescriptor::new::<UpdateProductParams>("update_product", "Update a product"),
            ToolDescriptor::new::<ProductIdParams>("delete_product", "Delete a product"),
            ToolDescriptor::new::<ListPricesParams>("list_prices", "List the prices of a product"),
            ToolDescriptor::new::<CreatePriceParams>("create_price", "Add a price to a product"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let request = match tool {
            "list_products" => {
                let mut p: ListProductsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.get("/products/").query(&p)?
            }
            "create_product" => {
                let mut p: CreateProductParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.post("/products/").json(&p)?
            }
            "get_product" | "delete_product" => {
                let mut p: ProductIdParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                let path = format!("/products/{}", seg(&p.product_id));
                let request = if tool == "get_product" {
                    client.get(path)
                } else {
                    client.delete(path)
                };
                request.query(&p)?
            }
            "update_product" => {
                let mut p: UpdateProductParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client
                    .put(format!("/products/{}", seg(&p.product_id)))
                    .json(&p)?
            }
            "list_prices" => {
                let mut p: ListPricesParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client
                    .get(format!("/products/{}/price", seg(&p.product_id)))
                    .query(&p)?
            }
            "create_price" => {
                let mut p: CreatePriceParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client
                    .post(format!("/products/{}/price", seg(&p.product_id)))
                    .json(&p)?
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };
        Ok(request.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::call_ok;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_price() {
        let req = call_ok(
            ProductTools::new,
            "create_price",
            json!({
                "productId": "p1",
                "name": "Monthly",
                "type": "recurring",
                "currency": "USD",
                "amount": 29.0,
                "recurring": {"interval": "month", "intervalCount": 1}
            }),
        )
        .await;
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/products/p1/price");
        let body = req.json();
        assert_eq!(body["type"], "recurring");
        assert_eq!(body["locationId"], "test-location");
        assert!(body.get("productId").is_none());
    }

    #[tokio::test]
    async fn test_delete_product_location_in_query() {
        let req = call_ok(ProductTools::new, "delete_product", json!({"productId": "p1"})).await;
        assert_eq!(req.method, "DELETE");
        assert_eq!(req.path, "/products/p1");
        assert_eq!(req.query.as_deref(), Some("locationId=test-location"));
    }
}
