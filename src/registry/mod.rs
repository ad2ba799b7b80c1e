//! Tool registry
//!
//! Maps every tool name to the module that serves it. Built once at startup
//! from the registered [`ToolModule`]s and read-only afterwards.

pub mod descriptor;
pub mod error;
pub mod registry;

pub use descriptor::{input_schema_for, ToolDescriptor};
pub use error::{RegistryError, ToolError};
pub use registry::{parse_args, ModuleInfo, ToolArgs, ToolModule, ToolRegistry};
