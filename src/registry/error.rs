use thiserror::Error;

use crate::client::ApiError;

/// Errors raised by a tool module while executing a call
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The module was asked to run a tool it does not implement
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors from registering modules or dispatching calls
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Tool module '{namespace}' is unavailable: {reason}")]
    ModuleUnavailable { namespace: String, reason: String },

    #[error("Tool '{name}' is declared by both '{first}' and '{second}'")]
    DuplicateTool {
        name: String,
        first: String,
        second: String,
    },

    #[error("Tool module '{0}' is registered twice")]
    DuplicateModule(String),

    #[error("Tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },
}

impl RegistryError {
    /// Short machine-readable classification, reported to clients
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::ToolNotFound(_) => "tool_not_found",
            RegistryError::ModuleUnavailable { .. } => "module_unavailable",
            RegistryError::DuplicateTool { .. } | RegistryError::DuplicateModule(_) => {
                "registration"
            }
            RegistryError::Tool { source, .. } => match source {
                ToolError::InvalidArguments(_) => "invalid_arguments",
                ToolError::UnknownTool(_) => "tool_not_found",
                ToolError::Api(_) => "upstream",
            },
        }
    }

    /// Upstream HTTP status, when the failure came from the API
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            RegistryError::Tool {
                source: ToolError::Api(e),
                ..
            } => e.status_code(),
            _ => None,
        }
    }
}
