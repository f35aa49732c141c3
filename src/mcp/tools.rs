//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::mcp::handlers::{GetDataHandler, GetFastaHandler, SearchHandler};
use crate::uniprot::UniProtClient;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "uniprot_search")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
///
/// Implementations deserialize the raw arguments into a typed input struct
/// before doing any work, so malformed arguments are rejected up front.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
///
/// A tagged dispatch table mapping tool names to typed handlers plus their
/// input-schema descriptors.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry with all UniProt tools registered
    pub fn from_client(client: Arc<UniProtClient>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        registry.register(Tool {
            name: "uniprot_search".to_string(),
            description: "Search the UniProt protein database. Returns matching entries with a \
                          summary of the first result."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "UniProt search query (e.g., 'insulin AND organism_name:human')"
                    },
                    "format": {
                        "type": "string",
                        "description": "Format of the returned data",
                        "enum": ["json", "xml", "tsv", "fasta", "list", "txt", "gff"],
                        "default": "json"
                    },
                    "fields": {
                        "type": "array",
                        "description": "Specific fields to retrieve (only for TSV and JSON formats)",
                        "items": { "type": "string" }
                    },
                    "include_isoform": {
                        "type": "boolean",
                        "description": "Whether to include isoforms in the search results",
                        "default": false
                    },
                    "size": {
                        "type": "integer",
                        "description": "Number of entries per page",
                        "default": 500
                    },
                    "compressed": {
                        "type": "boolean",
                        "description": "Whether to request compressed results",
                        "default": false
                    },
                    "paginate": {
                        "type": "boolean",
                        "description": "If true, report totals across all result pages. If false, return only the first page.",
                        "default": false
                    }
                },
                "required": ["query"]
            }),
            handler: Arc::new(SearchHandler {
                client: client.clone(),
            }),
        });

        registry.register(Tool {
            name: "uniprot_get_fasta".to_string(),
            description: "Retrieve the FASTA sequence for a UniProt accession.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "accession": {
                        "type": "string",
                        "description": "A valid UniProt accession (e.g., 'P38398')"
                    }
                },
                "required": ["accession"]
            }),
            handler: Arc::new(GetFastaHandler {
                client: client.clone(),
            }),
        });

        registry.register(Tool {
            name: "uniprot_get_data".to_string(),
            description: "Retrieve entry data for one or more UniProt accessions, with optional \
                          field selection."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "accessions": {
                        "description": "UniProt accession(s) to retrieve data for",
                        "oneOf": [
                            { "type": "string" },
                            { "type": "array", "items": { "type": "string" } }
                        ]
                    },
                    "fields": {
                        "type": "array",
                        "description": "Specific fields to retrieve",
                        "items": { "type": "string" }
                    }
                },
                "required": ["accessions"]
            }),
            handler: Arc::new(GetDataHandler { client }),
        });

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}
