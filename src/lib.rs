pub mod builder;
pub mod client;
pub mod config;
pub mod mcp;
pub mod registry;
pub mod tools;

#[cfg(any(test, feature = "testing"))]
#[doc(hidden)]
pub mod testing;

// Re-export commonly used items
pub use builder::build_registry;
pub use client::GhlClient;
pub use config::{Args, Config, ServerMode};
pub use mcp::McpInterface;
pub use registry::ToolRegistry;
