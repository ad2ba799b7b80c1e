//! MCP (Model Context Protocol) Interface
//!
//! Implements MCP 2024-11-05 over JSON-RPC 2.0, exposing the tool registry to
//! MCP clients.
//!
//! ## Modules
//!
//! - [`error`] - MCP errors with JSON-RPC error codes
//! - [`types`] - protocol types (requests, responses, capabilities)
//! - [`interface`] - [`McpInterface`], routes methods to handlers
//! - [`stdio`] - newline-delimited JSON over stdin/stdout
//! - [`sse`] - Server-Sent Events session registry
//! - [`transport`] - HTTP router (`/sse`, `/health`, `/tools`, `/capabilities`)

pub mod error;
pub mod interface;
pub mod sse;
pub mod stdio;
pub mod transport;
pub mod types;

pub use error::{JsonRpcError, McpError};
pub use interface::McpInterface;
pub use sse::SseSessions;
pub use types::*;
