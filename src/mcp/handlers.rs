//! Typed handlers for the UniProt MCP tools.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::tools::ToolHandler;
use crate::models::{OutputFormat, ProteinSummary, SearchRequest};
use crate::uniprot::UniProtClient;

/// Character budget for raw content echoed back to the model
const CONTENT_PREVIEW_CHARS: usize = 500;

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let mut preview: String = text.chars().take(limit).collect();
        preview.push_str("...");
        preview
    }
}

/// Handler for the `uniprot_search` tool
#[derive(Debug)]
pub struct SearchHandler {
    pub client: Arc<UniProtClient>,
}

#[async_trait::async_trait]
impl ToolHandler for SearchHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let request: SearchRequest = serde_json::from_value(args)
            .map_err(|e| format!("Invalid uniprot_search arguments: {}", e))?;

        if request.paginate {
            // Summarize the first page and report totals instead of feeding
            // every page to the model.
            let mut pages = self.client.search_pages(&request);
            let first = match pages.next_page().await {
                Some(result) => result.map_err(|e| e.to_string())?,
                None => return Err("Pagination yielded no pages".to_string()),
            };

            return Ok(json!({
                "total_results": first.total_results,
                "has_more_pages": first.has_next(),
                "summary": summarize_page(&first, &request.format),
                "content_preview": truncate_chars(
                    &first.content.to_display_string(),
                    CONTENT_PREVIEW_CHARS
                ),
                "note": "Use paginate=false for the full first page, or a smaller query to narrow results."
            }));
        }

        let page = self
            .client
            .search_page(&request)
            .await
            .map_err(|e| e.to_string())?;

        Ok(json!({
            "total_results": page.total_results,
            "has_more_pages": page.has_next(),
            "summary": summarize_page(&page, &request.format),
            "content_preview": truncate_chars(
                &page.content.to_display_string(),
                CONTENT_PREVIEW_CHARS
            ),
        }))
    }
}

/// Build a one-line summary of a result page
///
/// For JSON pages this distills the first entry (protein name, genes,
/// organism); other formats fall back to the total count.
fn summarize_page(page: &crate::models::SearchPage, format: &OutputFormat) -> String {
    if *format == OutputFormat::Json {
        match page.content.results().and_then(|r| r.first()) {
            Some(entry) => {
                let summary = ProteinSummary::from_entry(entry);
                format!(
                    "Total results: {}. First entry: {}",
                    page.total_results, summary
                )
            }
            None => "No results found for the given query.".to_string(),
        }
    } else {
        format!("Total results: {}.", page.total_results)
    }
}

/// Input for the `uniprot_get_fasta` tool
#[derive(Debug, Deserialize)]
struct GetFastaInput {
    accession: String,
}

/// Handler for the `uniprot_get_fasta` tool
#[derive(Debug)]
pub struct GetFastaHandler {
    pub client: Arc<UniProtClient>,
}

#[async_trait::async_trait]
impl ToolHandler for GetFastaHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let input: GetFastaInput = serde_json::from_value(args)
            .map_err(|e| format!("Invalid uniprot_get_fasta arguments: {}", e))?;

        let fasta = self
            .client
            .get_fasta(&input.accession)
            .await
            .map_err(|e| e.to_string())?;

        Ok(json!({
            "accession": input.accession,
            "fasta": fasta,
        }))
    }
}

/// One accession or several
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Input for the `uniprot_get_data` tool
#[derive(Debug, Deserialize)]
struct GetDataInput {
    accessions: OneOrMany,
    fields: Option<Vec<String>>,
}

/// Handler for the `uniprot_get_data` tool
#[derive(Debug)]
pub struct GetDataHandler {
    pub client: Arc<UniProtClient>,
}

#[async_trait::async_trait]
impl ToolHandler for GetDataHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let input: GetDataInput = serde_json::from_value(args)
            .map_err(|e| format!("Invalid uniprot_get_data arguments: {}", e))?;

        let accessions = input.accessions.into_vec();
        let page = self
            .client
            .get_data(&accessions, input.fields.as_deref())
            .await
            .map_err(|e| e.to_string())?;

        let entries: Vec<Value> = page
            .content
            .results()
            .map(|results| results.to_vec())
            .unwrap_or_default();

        Ok(json!({
            "accessions": accessions,
            "total_results": page.total_results,
            "entries": entries,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn handler_client(base_url: &str) -> Arc<UniProtClient> {
        Arc::new(UniProtClient::with_base_url(base_url).expect("client"))
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 500), "short");

        let long = "x".repeat(600);
        let truncated = truncate_chars(&long, 500);
        assert_eq!(truncated.chars().count(), 503);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_one_or_many() {
        let one: GetDataInput = serde_json::from_value(json!({"accessions": "P01308"})).unwrap();
        assert_eq!(one.accessions.into_vec(), vec!["P01308"]);

        let many: GetDataInput =
            serde_json::from_value(json!({"accessions": ["P01308", "P38398"]})).unwrap();
        assert_eq!(many.accessions.into_vec(), vec!["P01308", "P38398"]);
    }

    #[tokio::test]
    async fn test_search_handler_rejects_missing_query() {
        let handler = SearchHandler {
            client: handler_client("http://localhost:1"),
        };

        let result = handler.execute(json!({"size": 5})).await;
        assert!(result.unwrap_err().contains("Invalid uniprot_search arguments"));
    }

    #[tokio::test]
    async fn test_search_handler_summarizes_first_entry() {
        let mut server = mockito::Server::new_async().await;

        let body = json!({
            "results": [{
                "primaryAccession": "P01308",
                "proteinDescription": {
                    "recommendedName": { "fullName": { "value": "Insulin" } }
                },
                "genes": [{ "geneName": { "value": "INS" } }],
                "organism": { "scientificName": "Homo sapiens" }
            }]
        });

        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded(
                "query".into(),
                "insulin AND organism_name:human".into(),
            ))
            .with_status(200)
            .with_header("x-total-results", "13")
            .with_body(body.to_string())
            .create_async()
            .await;

        let handler = SearchHandler {
            client: handler_client(&server.url()),
        };

        let output = handler
            .execute(json!({"query": "insulin AND organism_name:human"}))
            .await
            .unwrap();

        assert_eq!(output["total_results"], 13);
        let summary = output["summary"].as_str().unwrap();
        assert!(summary.contains("Insulin"));
        assert!(summary.contains("INS"));
        assert!(summary.contains("Homo sapiens"));
    }

    #[tokio::test]
    async fn test_search_handler_no_results() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("x-total-results", "0")
            .with_body(json!({"results": []}).to_string())
            .create_async()
            .await;

        let handler = SearchHandler {
            client: handler_client(&server.url()),
        };

        let output = handler.execute(json!({"query": "zzznotaprotein"})).await.unwrap();
        assert_eq!(
            output["summary"],
            "No results found for the given query."
        );
    }

    #[tokio::test]
    async fn test_get_fasta_handler() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/P38398.fasta")
            .with_status(200)
            .with_body(">sp|P38398|BRCA1_HUMAN\nMDLSALRVEEVQNVINAMQKILECPICLE\n")
            .create_async()
            .await;

        let handler = GetFastaHandler {
            client: handler_client(&server.url()),
        };

        let output = handler.execute(json!({"accession": "P38398"})).await.unwrap();
        assert_eq!(output["accession"], "P38398");
        assert!(output["fasta"].as_str().unwrap().contains("BRCA1_HUMAN"));
    }

    #[tokio::test]
    async fn test_get_data_handler_returns_entries() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded(
                "query".into(),
                "accession:P38398".into(),
            ))
            .with_status(200)
            .with_header("x-total-results", "1")
            .with_body(json!({"results": [{"primaryAccession": "P38398"}]}).to_string())
            .create_async()
            .await;

        let handler = GetDataHandler {
            client: handler_client(&server.url()),
        };

        let output = handler
            .execute(json!({"accessions": "P38398", "fields": ["accession", "sequence"]}))
            .await
            .unwrap();

        assert_eq!(output["total_results"], 1);
        assert_eq!(output["entries"][0]["primaryAccession"], "P38398");
    }
}
