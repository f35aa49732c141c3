//! The paginated, retrying UniProtKB search client.

use futures_util::Stream;
use regex::Regex;
use reqwest::header::{HeaderMap, ACCEPT};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::models::{OutputFormat, PageContent, SearchPage, SearchRequest};
use crate::uniprot::UniProtError;
use crate::utils::{with_retry, HttpClient, RetryPolicy};

/// Base URL for the UniProtKB REST API
pub const UNIPROT_BASE_URL: &str = "https://rest.uniprot.org/uniprotkb";

/// Client for the UniProtKB REST API
///
/// Owns a pooled HTTP connection and a retry policy, both fixed at
/// construction. The client itself is cheap to clone; a single instance is
/// intended for a single logical caller at a time. For concurrent callers,
/// construct one client per caller (the underlying connection pool is
/// shared safely by reqwest).
#[derive(Debug, Clone)]
pub struct UniProtClient {
    http: Arc<HttpClient>,
    base_url: String,
    retry: RetryPolicy,
    re_next_link: Regex,
}

impl UniProtClient {
    /// Create a client against the public UniProtKB endpoint
    pub fn new() -> Result<Self, UniProtError> {
        Self::with_base_url(UNIPROT_BASE_URL)
    }

    /// Create a client against a custom base URL (for testing and mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, UniProtError> {
        Ok(Self {
            http: Arc::new(HttpClient::new()?),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            re_next_link: next_link_regex(),
        })
    }

    /// Create with an existing HTTP client
    pub fn with_client(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http: client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            re_next_link: next_link_regex(),
        }
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a single page of search results
    ///
    /// Issues exactly one GET (plus retries on transient failures) and
    /// ignores `request.paginate`; use [`search_pages`](Self::search_pages)
    /// to walk all pages.
    pub async fn search_page(&self, request: &SearchRequest) -> Result<SearchPage, UniProtError> {
        self.fetch_page(request, None).await
    }

    /// Walk all pages of a search as a cursor-holding sequence
    ///
    /// The returned [`SearchPages`] fetches pages strictly sequentially and
    /// on demand; nothing is requested until `next_page` is called. Each
    /// call to this method starts a fresh walk from the first page.
    pub fn search_pages(&self, request: &SearchRequest) -> SearchPages {
        SearchPages {
            client: self.clone(),
            request: request.clone(),
            cursor: None,
            done: false,
        }
    }

    /// Fetch the FASTA sequence for a UniProt accession
    pub async fn get_fasta(&self, accession: &str) -> Result<String, UniProtError> {
        let accession = accession.trim();
        if accession.is_empty() {
            return Err(UniProtError::InvalidRequest(
                "Empty UniProt accession".to_string(),
            ));
        }

        let url = format!("{}/{}.fasta", self.base_url, accession);
        let (_, body) = self.get_with_retry(&url, &[], "text/plain").await?;
        Ok(body)
    }

    /// Fetch the full JSON entry for a UniProt accession
    pub async fn get_entry(
        &self,
        accession: &str,
        fields: Option<&[String]>,
    ) -> Result<Value, UniProtError> {
        let accession = accession.trim();
        if accession.is_empty() {
            return Err(UniProtError::InvalidRequest(
                "Empty UniProt accession".to_string(),
            ));
        }

        let url = format!("{}/{}", self.base_url, accession);
        let mut params = vec![("format", "json".to_string())];
        if let Some(fields) = fields {
            params.push(("fields", fields.join(",")));
        }

        let (_, body) = self.get_with_retry(&url, &params, "application/json").await?;
        serde_json::from_str(&body)
            .map_err(|e| UniProtError::Parse(format!("Failed to parse entry JSON: {}", e)))
    }

    /// Fetch data for one or more accessions via the search endpoint
    ///
    /// Multiple accessions are OR-combined into a single query.
    pub async fn get_data(
        &self,
        accessions: &[String],
        fields: Option<&[String]>,
    ) -> Result<SearchPage, UniProtError> {
        if accessions.is_empty() {
            return Err(UniProtError::InvalidRequest(
                "At least one UniProt accession is required".to_string(),
            ));
        }

        let query = accessions
            .iter()
            .map(|a| format!("accession:{}", a.trim()))
            .collect::<Vec<_>>()
            .join(" OR ");

        let mut request = SearchRequest::new(query).size(accessions.len() as u32);
        if let Some(fields) = fields {
            request = request.fields(fields.to_vec());
        }

        self.search_page(&request).await
    }

    /// Issue one page fetch, optionally continuing from a cursor
    async fn fetch_page(
        &self,
        request: &SearchRequest,
        cursor: Option<&str>,
    ) -> Result<SearchPage, UniProtError> {
        let mut params = request.to_params();
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }

        let url = format!("{}/search", self.base_url);
        let (headers, body) = self
            .get_with_retry(&url, &params, request.format.accept_header())
            .await?;

        let total_results = headers
            .get("x-total-results")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let next_cursor = match self.next_link(&headers) {
            Some(link) => Some(self.extract_cursor(&link)?),
            None => None,
        };

        let content = match request.format {
            OutputFormat::Json => PageContent::Json(
                serde_json::from_str(&body)
                    .map_err(|e| UniProtError::Parse(format!("Failed to parse JSON page: {}", e)))?,
            ),
            _ => PageContent::Text(body),
        };

        Ok(SearchPage::new(content, total_results, next_cursor))
    }

    /// GET a URL through the retrying transport, returning headers and body
    async fn get_with_retry(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        accept: &str,
    ) -> Result<(HeaderMap, String), UniProtError> {
        let http = Arc::clone(&self.http);

        with_retry(&self.retry, || {
            let http = Arc::clone(&http);
            let url = url.to_string();
            let params = params.to_vec();
            let accept = accept.to_string();

            async move {
                let mut builder = http.client().get(&url).header(ACCEPT, accept);
                if !params.is_empty() {
                    builder = builder.query(&params);
                }

                let response = builder
                    .send()
                    .await
                    .map_err(|e| UniProtError::Network(format!("Failed to reach UniProt: {}", e)))?;

                let status = response.status();
                let final_url = response.url().to_string();
                let headers = response.headers().clone();
                let body = response
                    .text()
                    .await
                    .map_err(|e| UniProtError::Network(format!("Failed to read response: {}", e)))?;

                if !status.is_success() {
                    return Err(UniProtError::Api {
                        status: status.as_u16(),
                        url: final_url,
                        body,
                    });
                }

                Ok((headers, body))
            }
        })
        .await
    }

    /// Extract the continuation URL from the `Link` response header
    ///
    /// A missing header, or one that does not match `<URL>; rel="next"`, is
    /// treated as "no continuation" rather than an error.
    fn next_link(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers.get("link")?.to_str().ok()?;
        self.re_next_link
            .captures(value)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Pull the `cursor` query parameter out of a continuation URL
    ///
    /// A continuation link without a `cursor` parameter is an explicit
    /// error: silently re-fetching the first page would loop forever.
    fn extract_cursor(&self, next_link: &str) -> Result<String, UniProtError> {
        let url = Url::parse(next_link)
            .map_err(|e| UniProtError::MalformedContinuation(format!("{}: {}", next_link, e)))?;

        url.query_pairs()
            .find(|(key, _)| key == "cursor")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| {
                UniProtError::MalformedContinuation(format!(
                    "no cursor parameter in continuation link: {}",
                    next_link
                ))
            })
    }
}

fn next_link_regex() -> Regex {
    // The pattern is a literal and always compiles.
    Regex::new(r#"<(.+)>; rel="next""#).expect("invalid next-link regex")
}

/// A finite, non-restartable sequence of search result pages
///
/// Holds the continuation cursor explicitly; each `next_page` call issues
/// one HTTP request. The sequence ends when a page has no continuation
/// cursor, or after the first error. Abandoning the sequence simply stops
/// issuing requests; no cancellation is needed.
#[derive(Debug)]
pub struct SearchPages {
    client: UniProtClient,
    request: SearchRequest,
    cursor: Option<String>,
    done: bool,
}

impl SearchPages {
    /// Fetch the next page, or `None` when the sequence is exhausted
    pub async fn next_page(&mut self) -> Option<Result<SearchPage, UniProtError>> {
        if self.done {
            return None;
        }

        match self
            .client
            .fetch_page(&self.request, self.cursor.as_deref())
            .await
        {
            Ok(page) => {
                self.cursor = page.next_cursor.clone();
                if self.cursor.is_none() {
                    self.done = true;
                }
                Some(Ok(page))
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }

    /// Adapt the sequence into a `Stream` of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<SearchPage, UniProtError>> {
        let mut pages = self;
        async_stream::stream! {
            while let Some(item) = pages.next_page().await {
                yield item;
            }
        }
    }
}
