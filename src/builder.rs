//! Registry builder - constructs the tool registry with every module registered
//!
//! Used by the main binary and the integration tests.

use std::sync::Arc;

use crate::client::GhlClient;
use crate::registry::{RegistryError, ToolModule, ToolRegistry};
use crate::tools::{
    AssociationTools, BlogTools, CalendarTools, ContactTools, ConversationTools,
    CustomFieldTools, EmailIsvTools, EmailTools, InvoiceTools, LocationTools, MediaTools,
    ObjectTools, OpportunityTools, PaymentTools, ProductTools, SocialMediaTools, StoreTools,
    SurveyTools, WorkflowTools,
};

/// Reason recorded for modules named in the disabled list
pub const DISABLED_REASON: &str = "disabled by configuration";

/// Build the registry with all nineteen tool modules, in a fixed order.
///
/// Modules whose namespace appears in `disabled` are registered as
/// unavailable: their tools are not listed and calls to them fail with
/// [`RegistryError::ModuleUnavailable`].
pub fn build_registry(
    client: Arc<GhlClient>,
    disabled: &[String],
) -> Result<ToolRegistry, RegistryError> {
    let registry = ToolRegistry::new();
    let registry = add(registry, ContactTools::new(client.clone()), disabled)?;
    let registry = add(registry, ConversationTools::new(client.clone()), disabled)?;
    let registry = add(registry, BlogTools::new(client.clone()), disabled)?;
    let registry = add(registry, OpportunityTools::new(client.clone()), disabled)?;
    let registry = add(registry, CalendarTools::new(client.clone()), disabled)?;
    let registry = add(registry, EmailTools::new(client.clone()), disabled)?;
    let registry = add(registry, LocationTools::new(client.clone()), disabled)?;
    let registry = add(registry, EmailIsvTools::new(client.clone()), disabled)?;
    let registry = add(registry, SocialMediaTools::new(client.clone()), disabled)?;
    let registry = add(registry, MediaTools::new(client.clone()), disabled)?;
    let registry = add(registry, ObjectTools::new(client.clone()), disabled)?;
    let registry = add(registry, AssociationTools::new(client.clone()), disabled)?;
    let registry = add(registry, CustomFieldTools::new(client.clone()), disabled)?;
    let registry = add(registry, WorkflowTools::new(client.clone()), disabled)?;
    let registry = add(registry, SurveyTools::new(client.clone()), disabled)?;
    let registry = add(registry, StoreTools::new(client.clone()), disabled)?;
    let registry = add(registry, ProductTools::new(client.clone()), disabled)?;
    let registry = add(registry, PaymentTools::new(client.clone()), disabled)?;
    let registry = add(registry, InvoiceTools::new(client), disabled)?;

    let known: Vec<String> = registry.modules().into_iter().map(|m| m.namespace).collect();
    for name in disabled {
        if !known.contains(name) {
            tracing::warn!(module = %name, "Ignoring unknown module in disabled list");
        }
    }

    Ok(registry)
}

fn add<M: ToolModule>(
    registry: ToolRegistry,
    module: M,
    disabled: &[String],
) -> Result<ToolRegistry, RegistryError> {
    if disabled.iter().any(|d| d == module.namespace()) {
        tracing::info!(module = %module.namespace(), "Tool module disabled");
        registry.register_unavailable(module, DISABLED_REASON)
    } else {
        registry.register(module)
    }
}
