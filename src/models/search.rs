//! Search request and result-page models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output format for UniProt search results
///
/// Maps directly to the `format` query parameter of the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Xml,
    Tsv,
    Fasta,
    List,
    Txt,
    Gff,
}

impl OutputFormat {
    /// The `format` query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Fasta => "fasta",
            OutputFormat::List => "list",
            OutputFormat::Txt => "txt",
            OutputFormat::Gff => "gff",
        }
    }

    /// The `Accept` header sent for this format
    pub fn accept_header(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            _ => "text/plain",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UniProt search request parameters
///
/// Immutable once constructed; the remote server performs all validation
/// beyond basic types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// UniProt query string (e.g., "insulin AND organism_name:human")
    pub query: String,

    /// Format of the returned data
    #[serde(default)]
    pub format: OutputFormat,

    /// Specific fields to retrieve (only for TSV and JSON formats)
    pub fields: Option<Vec<String>>,

    /// Whether to include isoforms in the search results
    #[serde(default)]
    pub include_isoform: bool,

    /// Number of entries per page
    #[serde(default = "default_size")]
    pub size: u32,

    /// Whether to request compressed results
    #[serde(default)]
    pub compressed: bool,

    /// Whether to walk all result pages instead of just the first
    #[serde(default)]
    pub paginate: bool,
}

fn default_size() -> u32 {
    500
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            format: OutputFormat::Json,
            fields: None,
            include_isoform: false,
            size: default_size(),
            compressed: false,
            paginate: false,
        }
    }
}

impl SearchRequest {
    /// Create a new search request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the output format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the fields to retrieve
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Include isoforms in the results
    pub fn include_isoform(mut self, include: bool) -> Self {
        self.include_isoform = include;
        self
    }

    /// Set the page size
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Request compressed results
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Walk all result pages
    pub fn paginate(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    /// Build the query parameters for the search endpoint
    ///
    /// `fields` is joined into a single comma-separated value, order-preserving.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.clone()),
            ("format", self.format.as_str().to_string()),
            ("size", self.size.to_string()),
            ("includeIsoform", self.include_isoform.to_string()),
            ("compressed", self.compressed.to_string()),
        ];

        if let Some(fields) = &self.fields {
            params.push(("fields", fields.join(",")));
        }

        params
    }
}

/// Body of one result page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageContent {
    /// Decoded JSON body (format = json)
    Json(Value),
    /// Raw text body (all other formats)
    Text(String),
}

impl PageContent {
    /// The `results` array of a JSON page, if any
    pub fn results(&self) -> Option<&Vec<Value>> {
        match self {
            PageContent::Json(value) => value.get("results")?.as_array(),
            PageContent::Text(_) => None,
        }
    }

    /// Raw text of a non-JSON page
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PageContent::Text(text) => Some(text),
            PageContent::Json(_) => None,
        }
    }

    /// Render the content as a string (JSON is compact-serialized)
    pub fn to_display_string(&self) -> String {
        match self {
            PageContent::Json(value) => value.to_string(),
            PageContent::Text(text) => text.clone(),
        }
    }
}

/// One page of UniProt search results
///
/// Produced once per HTTP response and not mutated afterwards.
/// `total_results` is authoritative and constant across all pages of one
/// logical search; `next_cursor` is present iff the server signaled a
/// continuation link in this page's response headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    /// Parsed or raw response body
    pub content: PageContent,

    /// Total matching entries, from the `x-total-results` header (0 if absent)
    pub total_results: u64,

    /// Opaque continuation token for the next page, if any
    pub next_cursor: Option<String>,
}

impl SearchPage {
    /// Create a new search page
    pub fn new(content: PageContent, total_results: u64, next_cursor: Option<String>) -> Self {
        Self {
            content,
            total_results,
            next_cursor,
        }
    }

    /// Whether a continuation page exists
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_request() {
        let request = SearchRequest::new("insulin");
        assert_eq!(request.query, "insulin");
        assert_eq!(request.format, OutputFormat::Json);
        assert_eq!(request.size, 500);
        assert!(!request.include_isoform);
        assert!(!request.compressed);
        assert!(!request.paginate);
        assert!(request.fields.is_none());
    }

    #[test]
    fn test_to_params_defaults() {
        let params = SearchRequest::new("insulin").to_params();

        assert!(params.contains(&("query", "insulin".to_string())));
        assert!(params.contains(&("format", "json".to_string())));
        assert!(params.contains(&("size", "500".to_string())));
        assert!(params.contains(&("includeIsoform", "false".to_string())));
        assert!(params.contains(&("compressed", "false".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "fields"));
    }

    #[test]
    fn test_to_params_fields_comma_joined() {
        let params = SearchRequest::new("insulin")
            .fields(vec!["accession".to_string(), "gene_names".to_string()])
            .to_params();

        let fields = params
            .iter()
            .find(|(k, _)| *k == "fields")
            .map(|(_, v)| v.as_str());
        assert_eq!(fields, Some("accession,gene_names"));
    }

    #[test]
    fn test_to_params_stringified_booleans() {
        let params = SearchRequest::new("insulin")
            .include_isoform(true)
            .compressed(true)
            .to_params();

        assert!(params.contains(&("includeIsoform", "true".to_string())));
        assert!(params.contains(&("compressed", "true".to_string())));
    }

    #[test]
    fn test_accept_header() {
        assert_eq!(OutputFormat::Json.accept_header(), "application/json");
        assert_eq!(OutputFormat::Tsv.accept_header(), "text/plain");
        assert_eq!(OutputFormat::Fasta.accept_header(), "text/plain");
        assert_eq!(OutputFormat::Xml.accept_header(), "text/plain");
    }

    #[test]
    fn test_page_content_results() {
        let content = PageContent::Json(json!({"results": [{"a": 1}, {"a": 2}]}));
        assert_eq!(content.results().map(Vec::len), Some(2));

        let text = PageContent::Text(">sp|P01308|INS_HUMAN".to_string());
        assert!(text.results().is_none());
        assert_eq!(text.as_text(), Some(">sp|P01308|INS_HUMAN"));
    }
}
