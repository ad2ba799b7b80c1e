use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::{
    descriptor::ToolDescriptor,
    error::{RegistryError, ToolError},
};

/// Arguments of a tool call, as sent by the client
pub type ToolArgs = Map<String, Value>;

/// Deserialize tool arguments into the tool's parameter type
pub fn parse_args<P: DeserializeOwned>(args: ToolArgs) -> Result<P, ToolError> {
    serde_json::from_value(Value::Object(args)).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// A functional area of the upstream API exposed as a group of tools
///
/// Every module owns a disjoint set of tool names. `execute` performs exactly
/// one upstream call for the named tool and returns the parsed response.
#[async_trait]
pub trait ToolModule: Send + Sync + 'static {
    /// Module namespace (e.g., "contacts", "calendar")
    fn namespace(&self) -> &str;

    /// One-line summary of the module
    fn description(&self) -> &str {
        "No description available"
    }

    /// Tools this module provides
    fn tools(&self) -> Vec<ToolDescriptor>;

    /// Run one of this module's tools
    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError>;
}

/// Whether a registered module can serve calls
enum ModuleSlot {
    Available(Arc<dyn ToolModule>),
    Unavailable { reason: String },
}

struct ModuleEntry {
    namespace: String,
    description: String,
    tools: Vec<ToolDescriptor>,
    slot: ModuleSlot,
}

/// Summary of a registered module
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub namespace: String,
    pub description: String,
    /// Tools advertised by this module (0 when unavailable)
    pub tool_count: usize,
    /// Tools the module declares, advertised or not
    pub declared_tools: usize,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}

/// The tool registry - routes calls to the module owning each tool name
///
/// Descriptors are collected once at registration and indexed by name, so the
/// advertised tool list and the dispatch table cannot drift apart.
#[derive(Default)]
pub struct ToolRegistry {
    modules: Vec<ModuleEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Fails if one of its tool names is already taken.
    pub fn register<M: ToolModule>(self, module: M) -> Result<Self, RegistryError> {
        let namespace = module.namespace().to_string();
        let description = module.description().to_string();
        let tools = module.tools();
        self.insert(namespace, description, tools, ModuleSlot::Available(Arc::new(module)))
    }

    /// Register a module that must not serve calls.
    ///
    /// Its tools are not advertised, but calls naming them report
    /// [`RegistryError::ModuleUnavailable`] instead of an unknown tool.
    pub fn register_unavailable<M: ToolModule>(
        self,
        module: M,
        reason: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let namespace = module.namespace().to_string();
        let description = module.description().to_string();
        let tools = module.tools();
        self.insert(
            namespace,
            description,
            tools,
            ModuleSlot::Unavailable {
                reason: reason.into(),
            },
        )
    }

    fn insert(
        mut self,
        namespace: String,
        description: String,
        tools: Vec<ToolDescriptor>,
        slot: ModuleSlot,
    ) -> Result<Self, RegistryError> {
        if self.modules.iter().any(|m| m.namespace == namespace) {
            return Err(RegistryError::DuplicateModule(namespace));
        }

        let position = self.modules.len();
        for tool in &tools {
            if let Some(existing) = self.index.get(&tool.name) {
                let first = if *existing == position {
                    namespace.clone()
                } else {
                    self.modules[*existing].namespace.clone()
                };
                return Err(RegistryError::DuplicateTool {
                    name: tool.name.clone(),
                    first,
                    second: namespace,
                });
            }
            self.index.insert(tool.name.clone(), position);
        }

        self.modules.push(ModuleEntry {
            namespace,
            description,
            tools,
            slot,
        });
        Ok(self)
    }

    /// All advertised tools, in module registration order
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.available_entries()
            .flat_map(|m| m.tools.iter().cloned())
            .collect()
    }

    /// Number of advertised tools
    pub fn tool_count(&self) -> usize {
        self.available_entries().map(|m| m.tools.len()).sum()
    }

    /// Information about every registered module, in registration order
    pub fn modules(&self) -> Vec<ModuleInfo> {
        self.modules
            .iter()
            .map(|m| {
                let available = matches!(m.slot, ModuleSlot::Available(_));
                ModuleInfo {
                    namespace: m.namespace.clone(),
                    description: m.description.clone(),
                    tool_count: if available { m.tools.len() } else { 0 },
                    declared_tools: m.tools.len(),
                    available,
                    unavailable_reason: match &m.slot {
                        ModuleSlot::Unavailable { reason } => Some(reason.clone()),
                        ModuleSlot::Available(_) => None,
                    },
                }
            })
            .collect()
    }

    /// Namespace of the module owning `tool`
    pub fn resolve(&self, tool: &str) -> Option<&str> {
        self.index
            .get(tool)
            .map(|position| self.modules[*position].namespace.as_str())
    }

    /// Dispatch a tool call to its owning module
    pub async fn invoke(&self, tool: &str, args: ToolArgs) -> Result<Value, RegistryError> {
        let position = self
            .index
            .get(tool)
            .ok_or_else(|| RegistryError::ToolNotFound(tool.to_string()))?;
        let entry = &self.modules[*position];

        match &entry.slot {
            ModuleSlot::Available(module) => {
                tracing::debug!(tool = %tool, namespace = %entry.namespace, "Invoking tool");
                module
                    .execute(tool, args)
                    .await
                    .map_err(|source| RegistryError::Tool {
                        tool: tool.to_string(),
                        source,
                    })
            }
            ModuleSlot::Unavailable { reason } => Err(RegistryError::ModuleUnavailable {
                namespace: entry.namespace.clone(),
                reason: reason.clone(),
            }),
        }
    }

    fn available_entries(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.modules
            .iter()
            .filter(|m| matches!(m.slot, ModuleSlot::Available(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, JsonSchema)]
    struct EchoParams {
        message: String,
    }

    struct EchoModule {
        namespace: &'static str,
        names: Vec<&'static str>,
    }

    impl EchoModule {
        fn new(namespace: &'static str, names: &[&'static str]) -> Self {
            Self {
                namespace,
                names: names.to_vec(),
            }
        }
    }

    #[async_trait]
    impl ToolModule for EchoModule {
        fn namespace(&self) -> &str {
            self.namespace
        }

        fn tools(&self) -> Vec<ToolDescriptor> {
            self.names
                .iter()
                .map(|n| ToolDescriptor::new::<EchoParams>(*n, "Echo a message"))
                .collect()
        }

        async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
            if !self.names.contains(&tool) {
                return Err(ToolError::UnknownTool(tool.to_string()));
            }
            let params: EchoParams = parse_args(args)?;
            Ok(json!({ "module": self.namespace, "tool": tool, "message": params.message }))
        }
    }

    fn args(value: Value) -> ToolArgs {
        match value {
            Value::Object(map) => map,
            _ => ToolArgs::new(),
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::new()
            .register(EchoModule::new("alpha", &["a_one", "a_two"]))
            .unwrap()
            .register(EchoModule::new("beta", &["b_one"]))
            .unwrap()
    }

    #[test]
    fn test_list_tools_in_registration_order() {
        let registry = registry();
        let names: Vec<_> = registry.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a_one", "a_two", "b_one"]);
        assert_eq!(registry.tool_count(), 3);
        // Stable across calls
        assert_eq!(registry.list_tools(), registry.list_tools());
    }

    #[test]
    fn test_resolve_owner() {
        let registry = registry();
        assert_eq!(registry.resolve("a_two"), Some("alpha"));
        assert_eq!(registry.resolve("b_one"), Some("beta"));
        assert_eq!(registry.resolve("missing"), None);
    }

    #[tokio::test]
    async fn test_invoke_routes_to_owner() {
        let registry = registry();
        let result = registry
            .invoke("b_one", args(json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"module": "beta", "tool": "b_one", "message": "hi"}));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = registry();
        let err = registry.invoke("nope", ToolArgs::new()).await.unwrap_err();
        assert!(matches!(err, RegistryError::ToolNotFound(ref n) if n == "nope"));
        assert_eq!(err.kind(), "tool_not_found");
    }

    #[tokio::test]
    async fn test_invalid_arguments_propagate() {
        let registry = registry();
        let err = registry
            .invoke("a_one", args(json!({"message": 5})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_arguments");
    }

    #[test]
    fn test_duplicate_tool_rejected() {
        let err = ToolRegistry::new()
            .register(EchoModule::new("alpha", &["shared"]))
            .unwrap()
            .register(EchoModule::new("beta", &["shared"]))
            .err()
            .unwrap();
        match err {
            RegistryError::DuplicateTool { name, first, second } => {
                assert_eq!(name, "shared");
                assert_eq!(first, "alpha");
                assert_eq!(second, "beta");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_within_module_rejected() {
        let err = ToolRegistry::new()
            .register(EchoModule::new("alpha", &["twice", "twice"]))
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::DuplicateTool { .. }));
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let err = ToolRegistry::new()
            .register(EchoModule::new("alpha", &["a"]))
            .unwrap()
            .register(EchoModule::new("alpha", &["b"]))
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::DuplicateModule(_)));
    }

    #[tokio::test]
    async fn test_unavailable_module() {
        let registry = ToolRegistry::new()
            .register(EchoModule::new("alpha", &["a_one"]))
            .unwrap()
            .register_unavailable(EchoModule::new("beta", &["b_one"]), "disabled by configuration")
            .unwrap();

        let names: Vec<_> = registry.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a_one"]);

        let err = registry
            .invoke("b_one", args(json!({"message": "hi"})))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ModuleUnavailable { ref namespace, .. } if namespace == "beta"));

        let modules = registry.modules();
        assert_eq!(modules.len(), 2);
        assert!(modules[0].available);
        assert!(!modules[1].available);
        assert_eq!(
            modules[1].unavailable_reason.as_deref(),
            Some("disabled by configuration")
        );
        assert_eq!(modules[1].tool_count, 0);
        assert_eq!(modules[1].declared_tools, 1);

        let advertised: usize = modules.iter().map(|m| m.tool_count).sum();
        assert_eq!(advertised, registry.tool_count());
    }
}
