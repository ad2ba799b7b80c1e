//! Invoice, invoice template and estimate tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::location_alt_type;
use crate::client::{encode_segment as seg, GhlClient};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

/// Invoice owner, sent with every invoice request
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOwner {
    /// Owner id (defaults to the configured location)
    pub alt_id: Option<String>,
    /// Owner type (default location)
    #[serde(default = "location_alt_type")]
    pub alt_type: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(flatten)]
    pub owner: InvoiceOwner,
    /// Maximum results (default 10)
    pub limit: Option<u32>,
    /// Number to skip (default 0)
    pub offset: Option<u32>,
    /// Free text search
    pub search: Option<String>,
    /// draft, sent, payment_processing, paid, void or partially_paid
    pub status: Option<String>,
    /// Only invoices of this contact
    pub contact_id: Option<String>,
}

/// Body shared by invoices, templates and estimates
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDocument {
    #[serde(flatten)]
    pub owner: InvoiceOwner,
    /// Document name
    pub name: String,
    /// Line items: [{"name": "...", "currency": "USD", "amount": 10, "qty": 1}]
    pub items: Vec<Value>,
    /// ISO currency code (default USD)
    pub currency: Option<String>,
    pub title: Option<String>,
    /// Recipient: {"id": "...", "name": "...", "email": "..."}
    pub contact_details: Option<Value>,
    /// Issue date, YYYY-MM-DD
    pub issue_date: Option<String>,
    /// Due date, YYYY-MM-DD
    pub due_date: Option<String>,
    /// Sender business details
    pub business_details: Option<Value>,
    /// {"type": "percentage", "value": 10}
    pub discount: Option<Value>,
    pub terms_notes: Option<String>,
    pub live_mode: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceIdParams {
    /// Invoice id
    #[serde(skip_serializing)]
    pub invoice_id: String,
    #[serde(flatten)]
    pub owner: InvoiceOwner,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceParams {
    /// Invoice id
    #[serde(skip_serializing)]
    pub invoice_id: String,
    #[serde(flatten)]
    pub owner: InvoiceOwner,
    /// sms_and_email, send_manually, email or sms (default sms_and_email)
    pub action: Option<String>,
    /// Send in live mode (default true)
    pub live_mode: Option<bool>,
    /// User sending the invoice
    pub user_id: Option<String>,
}

pub struct InvoiceTools {
    client: Arc<GhlClient>,
}

impl InvoiceTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }

    fn fill(&self, owner: &mut InvoiceOwner) {
        owner.alt_id = Some(self.client.location_or_default(owner.alt_id.take()));
    }

    fn list_query(&self, mut p: ListParams) -> ListParams {
        self.fill(&mut p.owner);
        p.limit = Some(p.limit.unwrap_or(10));
        p.offset = Some(p.offset.unwrap_or(0));
        p
    }

    fn document(&self, mut p: InvoiceDocument) -> InvoiceDocument {
        self.fill(&mut p.owner);
        p.currency.get_or_insert_with(|| "USD".to_string());
        p
    }
}

#[async_trait]
impl ToolModule for InvoiceTools {
    fn namespace(&self) -> &str {
        "invoices"
    }

    fn description(&self) -> &str {
        "Manage invoices, invoice templates and estimates"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<ListParams>("list_invoice_templates", "List invoice templates"),
            ToolDescriptor::new::<InvoiceDocument>("create_invoice_template", "Create an invoice template"),
            ToolDescriptor::new::<ListParams>("list_invoices", "List invoices"),
            ToolDescriptor::new::<InvoiceDocument>("create_invoice", "Create a draft invoice"),
            ToolDescriptor::new::<InvoiceIdParams>("get_invoice", "Get an invoice by id"),
            ToolDescriptor::new::<SendInvoiceParams>("send_invoice", "Send an invoice to its contact"),
            ToolDescriptor::new::<InvoiceIdParams>("void_invoice", "Void an invoice"),
            ToolDescriptor::new::<InvoiceOwner>(
                "generate_invoice_number",
                "Reserve the next invoice number",
            ),
            ToolDescriptor::new::<ListParams>("list_estimates", "List estimates"),
            ToolDescriptor::new::<InvoiceDocument>("create_estimate", "Create an estimate"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let request = match tool {
            "list_invoice_templates" | "list_invoices" | "list_estimates" => {
                let p = self.list_query(parse_args(args)?);
                let path = match tool {
                    "list_invoice_templates" => "/invoices/template",
                    "list_invoices" => "/invoices/",
                    _ => "/invoices/estimate/list",
                };
                client.get(path).query(&p)?
            }
            "create_invoice_template" | "create_invoice" | "create_estimate" => {
                let p = self.document(parse_args(args)?);
                let path = match tool {
                    "create_invoice_template" => "/invoices/template",
                    "create_invoice" => "/invoices/",
                    _ => "/invoices/estimate",
                };
                client.post(path).json(&p)?
            }
            "get_invoice" => {
                let mut p: InvoiceIdParams = parse_args(args)?;
                self.fill(&mut p.owner);
                client
                    .get(format!("/invoices/{}", seg(&p.invoice_id)))
                    .query(&p)?
            }
            "send_invoice" => {
                let mut p: SendInvoiceParams = parse_args(args)?;
                self.fill(&mut p.owner);
                p.action.get_or_insert_with(|| "sms_and_email".to_string());
                p.live_mode = Some(p.live_mode.unwrap_or(true));
                client
                    .post(format!("/invoices/{}/send", seg(&p.invoice_id)))
                    .json(&p)?
            }
            "void_invoice" => {
                let mut p: InvoiceIdParams = parse_args(args)?;
                self.fill(&mut p.owner);
                client
                    .post(format!("/invoices/{}/void", seg(&p.invoice_id)))
                    .json(&p)?
            }
            "generate_invoice_number" => {
                let mut owner: InvoiceOwner = parse_args(args)?;
                self.fill(&mut owner);
                client.get("/invoices/generate-invoice-number").query(&owner)?
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };
        Ok(request.send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{call, call_ok};
    use serde_json::json;

    #[tokio::test]
    async fn test_send_invoice_defaults() {
        let req = call_ok(InvoiceTools::new, "send_invoice", json!({"invoiceId": "inv1"})).await;
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/invoices/inv1/send");
        assert_eq!(
            req.json(),
            json!({
                "altId": "test-location",
                "altType": "location",
                "action": "sms_and_email",
                "liveMode": true
            })
        );
    }

    #[tokio::test]
    async fn test_create_estimate_defaults_currency() {
        let req = call_ok(
            InvoiceTools::new,
            "create_estimate",
            json!({"name": "Website", "items": [{"name": "Design", "amount": 500, "qty": 1}]}),
        )
        .await;
        assert_eq!(req.path, "/invoices/estimate");
        let body = req.json();
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["altId"], "test-location");
    }

    #[tokio::test]
    async fn test_list_estimates_paging() {
        let req = call_ok(InvoiceTools::new, "list_estimates", json!({})).await;
        assert_eq!(req.path, "/invoices/estimate/list");
        let query = req.query.unwrap_or_default();
        assert!(query.contains("limit=10"));
        assert!(query.contains("offset=0"));
    }

    #[tokio::test]
    async fn test_invoice_requires_items() {
        let (result, _) = call(InvoiceTools::new, "create_invoice", json!({"name": "x"})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
