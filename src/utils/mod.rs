//! Utility modules supporting UniProt operations.
//!
//! - [`HttpClient`]: shared HTTP client with sensible timeouts
//! - [`RetryPolicy`]: configuration for retry logic with exponential backoff
//! - [`with_retry`]: execute an operation with automatic retry on transient errors
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use uniprot_mcp::utils::{with_retry, RetryPolicy};
//! use uniprot_mcp::uniprot::UniProtError;
//!
//! # async fn fetch_data() -> Result<String, UniProtError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), UniProtError> {
//! let policy = RetryPolicy::default();
//! let result = with_retry(&policy, || async { fetch_data().await }).await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;

pub use http::{HttpClient, DEFAULT_TIMEOUT_SECS};
pub use retry::{with_retry, RetryPolicy, DEFAULT_RETRY_STATUSES};
