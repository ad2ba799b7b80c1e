//! GoHighLevel tool modules
//!
//! One module per functional area of the API. Each tool has a typed parameter
//! struct: its `JsonSchema` derive is the advertised `inputSchema`, and its
//! `Deserialize` derive validates incoming arguments. Path parameters are
//! `skip_serializing` so the remaining fields can be sent as the body or query.

pub mod associations;
pub mod blogs;
pub mod calendar;
pub mod contacts;
pub mod conversations;
pub mod custom_fields;
pub mod email;
pub mod email_isv;
pub mod invoices;
pub mod locations;
pub mod media;
pub mod objects;
pub mod opportunities;
pub mod payments;
pub mod products;
pub mod social_media;
pub mod store;
pub mod surveys;
pub mod workflows;

pub use associations::AssociationTools;
pub use blogs::BlogTools;
pub use calendar::CalendarTools;
pub use contacts::ContactTools;
pub use conversations::ConversationTools;
pub use custom_fields::CustomFieldTools;
pub use email::EmailTools;
pub use email_isv::EmailIsvTools;
pub use invoices::InvoiceTools;
pub use locations::LocationTools;
pub use media::MediaTools;
pub use objects::ObjectTools;
pub use opportunities::OpportunityTools;
pub use payments::PaymentTools;
pub use products::ProductTools;
pub use social_media::SocialMediaTools;
pub use store::StoreTools;
pub use surveys::SurveyTools;
pub use workflows::WorkflowTools;

/// `altType` used by the payments, invoices and store endpoints
pub(crate) fn location_alt_type() -> String {
    "location".to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::client::GhlClient;
    use crate::registry::{ToolArgs, ToolError, ToolModule};
    use crate::testing::{RecordedRequest, StubUpstream};

    /// Run one tool against a stub upstream answering `{"ok": true}`
    pub async fn call<M, F>(
        make: F,
        tool: &str,
        args: Value,
    ) -> (Result<Value, ToolError>, Vec<RecordedRequest>)
    where
        M: ToolModule,
        F: FnOnce(Arc<GhlClient>) -> M,
    {
        let upstream = StubUpstream::spawn(StatusCode::OK, json!({"ok": true})).await;
        let client = Arc::new(GhlClient::new(upstream.api_config()).unwrap());
        let module = make(client);
        let args = match args {
            Value::Object(map) => map,
            _ => ToolArgs::new(),
        };
        let result = module.execute(tool, args).await;
        (result, upstream.requests())
    }

    /// Like [`call`], but expects success and exactly one upstream request
    pub async fn call_ok<M, F>(make: F, tool: &str, args: Value) -> RecordedRequest
    where
        M: ToolModule,
        F: FnOnce(Arc<GhlClient>) -> M,
    {
        let (result, mut requests) = call(make, tool, args).await;
        assert!(result.is_ok(), "{tool} failed: {:?}", result.err());
        assert_eq!(requests.len(), 1, "{tool} should make exactly one upstream call");
        requests.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::client::{ApiConfig, GhlClient, DEFAULT_API_VERSION};
    use crate::registry::{ToolArgs, ToolError, ToolModule};

    fn offline_client() -> Arc<GhlClient> {
        Arc::new(
            GhlClient::new(ApiConfig {
                api_key: "k".into(),
                base_url: "http://127.0.0.1:1".into(),
                api_version: DEFAULT_API_VERSION.into(),
                location_id: "loc".into(),
                timeout: Some(std::time::Duration::from_secs(1)),
            })
            .unwrap(),
        )
    }

    fn all_modules(client: Arc<GhlClient>) -> Vec<Box<dyn ToolModule>> {
        vec![
            Box::new(ContactTools::new(client.clone())),
            Box::new(ConversationTools::new(client.clone())),
            Box::new(BlogTools::new(client.clone())),
            Box::new(OpportunityTools::new(client.clone())),
            Box::new(CalendarTools::new(client.clone())),
            Box::new(EmailTools::new(client.clone())),
            Box::new(LocationTools::new(client.clone())),
            Box::new(EmailIsvTools::new(client.clone())),
            Box::new(SocialMediaTools::new(client.clone())),
            Box::new(MediaTools::new(client.clone())),
            Box::new(ObjectTools::new(client.clone())),
            Box::new(AssociationTools::new(client.clone())),
            Box::new(CustomFieldTools::new(client.clone())),
            Box::new(WorkflowTools::new(client.clone())),
            Box::new(SurveyTools::new(client.clone())),
            Box::new(StoreTools::new(client.clone())),
            Box::new(ProductTools::new(client.clone())),
            Box::new(PaymentTools::new(client.clone())),
            Box::new(InvoiceTools::new(client)),
        ]
    }

    #[test]
    fn test_nineteen_modules_with_unique_names() {
        let modules = all_modules(offline_client());
        assert_eq!(modules.len(), 19);

        let namespaces: HashSet<_> = modules.iter().map(|m| m.namespace().to_string()).collect();
        assert_eq!(namespaces.len(), 19);

        let mut seen = HashSet::new();
        for module in &modules {
            for tool in module.tools() {
                assert!(seen.insert(tool.name.clone()), "duplicate tool {}", tool.name);
                assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
                assert!(!tool.description.is_empty(), "{}", tool.name);
            }
        }
    }

    #[tokio::test]
    async fn test_every_declared_tool_is_executable() {
        // No upstream is listening, so a routed call fails on arguments or on
        // the connection, never as an unknown tool.
        for module in all_modules(offline_client()) {
            for tool in module.tools() {
                let result = module.execute(&tool.name, ToolArgs::new()).await;
                assert!(
                    !matches!(result, Err(ToolError::UnknownTool(_))),
                    "{}::{} is declared but not routed",
                    module.namespace(),
                    tool.name
                );
            }
        }
    }

    #[tokio::test]
    async fn test_undeclared_tool_is_unknown() {
        for module in all_modules(offline_client()) {
            let result = module.execute("definitely_not_a_tool", ToolArgs::new()).await;
            assert!(matches!(result, Err(ToolError::UnknownTool(_))));
        }
    }
}
