//! # UniProt MCP
//!
//! A Model Context Protocol (MCP) server exposing the UniProtKB REST search
//! API as typed tools for chat models with tool-calling.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SearchRequest, SearchPage, etc.)
//! - [`uniprot`]: The paginated, retrying UniProtKB client
//! - [`mcp`]: MCP protocol implementation and server
//! - [`utils`]: HTTP client and retry utilities
//! - [`config`]: Configuration management

pub mod config;
pub mod mcp;
pub mod models;
pub mod uniprot;
pub mod utils;

// Re-export commonly used types
pub use models::{SearchPage, SearchRequest};
pub use uniprot::{UniProtClient, UniProtError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
