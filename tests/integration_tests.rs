//! Integration tests for UniProt MCP
//!
//! These tests verify the tool registry, the MCP server wiring, and the
//! end-to-end flow from tool arguments to HTTP requests against a mocked
//! UniProt endpoint.

use mockito::Matcher;
use serde_json::json;
use std::sync::Arc;
use uniprot_mcp::mcp::{McpServer, ToolRegistry};
use uniprot_mcp::uniprot::UniProtClient;

fn client_for(url: &str) -> Arc<UniProtClient> {
    Arc::new(UniProtClient::with_base_url(url).expect("client"))
}

#[test]
fn test_registry_has_all_uniprot_tools() {
    let registry = ToolRegistry::from_client(client_for("http://localhost:1"));

    assert_eq!(registry.len(), 3);
    assert!(registry.has("uniprot_search"));
    assert!(registry.has("uniprot_get_fasta"));
    assert!(registry.has("uniprot_get_data"));
}

#[test]
fn test_tool_schemas_are_objects() {
    let registry = ToolRegistry::from_client(client_for("http://localhost:1"));

    for tool in registry.all() {
        assert_eq!(
            tool.input_schema["type"], "object",
            "Tool '{}' should declare an object schema",
            tool.name
        );
        assert!(
            tool.input_schema["required"].is_array(),
            "Tool '{}' should declare required fields",
            tool.name
        );
        assert!(!tool.description.is_empty());
    }
}

#[test]
fn test_server_exposes_registry() {
    let server = McpServer::new(client_for("http://localhost:1"));
    assert_eq!(server.tools().len(), 3);
}

#[tokio::test]
async fn test_search_tool_end_to_end() {
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

    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "insulin".into()),
            Matcher::UrlEncoded("size".into(), "1".into()),
            Matcher::UrlEncoded("fields".into(), "accession,gene_names".into()),
        ]))
        .with_status(200)
        .with_header("x-total-results", "13")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    let registry = ToolRegistry::from_client(client_for(&server.url()));
    let output = registry
        .execute(
            "uniprot_search",
            json!({
                "query": "insulin",
                "size": 1,
                "fields": ["accession", "gene_names"]
            }),
        )
        .await
        .unwrap();

    assert_eq!(output["total_results"], 13);
    assert!(output["summary"].as_str().unwrap().contains("Insulin"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_tool_surfaces_api_failure() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body("Invalid query syntax")
        .create_async()
        .await;

    let registry = ToolRegistry::from_client(client_for(&server.url()));
    let result = registry
        .execute("uniprot_search", json!({"query": "insulin AND ("}))
        .await;

    // The failure is reported to the caller, not swallowed
    let error = result.unwrap_err();
    assert!(error.contains("400"));
    assert!(error.contains("Invalid query syntax"));
}

#[tokio::test]
async fn test_fasta_tool_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/P01308.fasta")
        .with_status(200)
        .with_body(">sp|P01308|INS_HUMAN Insulin\nMALWMRLLPLLALLALWGPDPAAA\n")
        .create_async()
        .await;

    let registry = ToolRegistry::from_client(client_for(&server.url()));
    let output = registry
        .execute("uniprot_get_fasta", json!({"accession": "P01308"}))
        .await
        .unwrap();

    assert!(output["fasta"].as_str().unwrap().starts_with(">sp|P01308"));
}

#[tokio::test]
async fn test_invalid_arguments_rejected_before_any_request() {
    // Port 1 is never listening; a request would fail with a network error,
    // but validation rejects the arguments first.
    let registry = ToolRegistry::from_client(client_for("http://localhost:1"));

    let result = registry
        .execute("uniprot_get_fasta", json!({"wrong_field": "P01308"}))
        .await;
    assert!(result.unwrap_err().contains("Invalid uniprot_get_fasta arguments"));

    let result = registry.execute("uniprot_search", json!({})).await;
    assert!(result.unwrap_err().contains("Invalid uniprot_search arguments"));
}
