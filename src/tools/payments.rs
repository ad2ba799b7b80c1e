//! Payment tools: orders, transactions, subscriptions and coupons

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::location_alt_type;
use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

/// Filters shared by the order, transaction and subscription listings
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListParams {
    /// Owner id (defaults to the configured location)
    pub alt_id: Option<String>,
    /// Owner type (default location)
    #[serde(default = "location_alt_type")]
    pub alt_type: String,
    /// Only records of this contact
    pub contact_id: Option<String>,
    /// live or test
    pub payment_mode: Option<String>,
    /// Range start, YYYY-MM-DD
    pub start_at: Option<String>,
    /// Range end, YYYY-MM-DD
    pub end_at: Option<String>,
    /// Free text search
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIdParams {
    /// Order or transaction id
    #[serde(skip_serializing)]
    pub id: String,
    /// Owner id (defaults to the configured location)
    pub alt_id: Option<String>,
    /// Owner type (default location)
    #[serde(default = "location_alt_type")]
    pub alt_type: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListCouponsParams {
    /// Owner id (defaults to the configured location)
    pub alt_id: Option<String>,
    /// Owner type (default location)
    #[serde(default = "location_alt_type")]
    pub alt_type: String,
    /// scheduled, active or expired
    pub status: Option<String>,
    /// Search by name or code
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponParams {
    /// Owner id (defaults to the configured location)
    pub alt_id: Option<String>,
    /// Owner type (default location)
    #[serde(default = "location_alt_type")]
    pub alt_type: String,
    pub name: String,
    /// Code customers enter
    pub code: String,
    /// percentage or amount
    pub discount_type: String,
    pub discount_value: f64,
    /// ISO 8601 start
    pub start_date: String,
    /// ISO 8601 end
    pub end_date: Option<String>,
    pub usage_limit: Option<u32>,
    /// Restrict to these products
    pub product_ids: Option<Vec<String>>,
    pub apply_to_future_payments: Option<bool>,
    pub limit_per_customer: Option<bool>,
}

pub struct PaymentTools {
    client: Arc<GhlClient>,
}

impl PaymentTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }

    fn owner(&self, alt_id: &mut Option<String>) {
        *alt_id = Some(self.client.location_or_default(alt_id.take()));
    }
}

#[async_trait]
impl ToolModule for PaymentTools {
    fn namespace(&self) -> &str {
        "payments"
    }

    fn description(&self) -> &str {
        "Read orders, transactions and subscriptions; manage coupons"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<PaymentListParams>("list_orders", "List orders"),
            ToolDescriptor::new::<PaymentIdParams>("get_order", "Get an order by id"),
            ToolDescriptor::new::<PaymentListParams>("list_transactions", "List transactions"),
            ToolDescriptor::new::<PaymentIdParams>("get_transaction", "Get a transaction by id"),
            ToolDescriptor::new::<PaymentListParams>("list_subscriptions", "List subscriptions"),
            ToolDescriptor::new::<ListCouponsParams>("list_coupons", "List coupons"),
            ToolDescriptor::new::<CreateCouponParams>("create_coupon", "Create a coupon"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let request = match tool {
            "list_orders" | "list_transactions" | "list_subscriptions" => {
                let mut p: PaymentListParams = parse_args(args)?;
                self.owner(&mut p.alt_id);
                let path = match tool {
                    "list_orders" => "/payments/orders",
                    "list_transactions" => "/payments/transactions",
                    _ => "/payments/subscriptions",
                };
                client.get(path).query(&p)?
            }
            "get_order" | "get_transaction" => {
                let mut p: PaymentIdParams = parse_args(args)?;
                self.owner(&mut p.alt_id);
                let collection = if tool == "get_order" {
                    "orders"
                } else {
                    "transactions"
                };
                client
                    .get(format!("/payments/{}/{}", collection, seg(&p.id)))
                    .query(&p)?
            }
            "list_coupons" => {
                let mut p: ListCouponsParams = parse_args(args)?;
                self.owner(&mut p.alt_id);
                client.get("/payments/coupon/list").query(&p)?
            }
            "create_coupon" => {
                let mut p: CreateCouponParams = parse_args(args)?;
                self.owner(&mut p.alt_id);
                client.post("/payments/coupon").json(&p)?
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };
        Ok(request.send().await?)
    }
}
