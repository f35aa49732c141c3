//! MCP protocol implementation: tool registry, handlers, and server.

pub mod handlers;
pub mod server;
pub mod tools;

pub use server::McpServer;
pub use tools::{Tool, ToolHandler, ToolRegistry};
