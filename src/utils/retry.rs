//! Retry utilities with exponential backoff for resilient API calls.

use std::time::Duration;
use tokio::time::sleep;

use crate::uniprot::UniProtError;

/// HTTP statuses retried by default (transient server failures)
pub const DEFAULT_RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Configuration for retry behavior
///
/// Fixed at client construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first request)
    pub max_attempts: u32,
    /// Base delay for exponential backoff
    pub backoff_base: Duration,
    /// HTTP statuses that trigger a retry
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base: Duration::from_millis(250),
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Whether an error should trigger another attempt.
    ///
    /// Network-level failures (timeout, connection refused, DNS) and the
    /// configured server statuses are retryable; everything else fails fast.
    pub fn is_retryable(&self, error: &UniProtError) -> bool {
        match error {
            UniProtError::Network(_) => true,
            UniProtError::Api { status, .. } => self.retry_statuses.contains(status),
            _ => false,
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    ///
    /// Strictly increasing: base * 2^(attempt - 1).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff_base.saturating_mul(factor)
    }
}

/// Execute an async operation with retry logic
///
/// Issues at most `policy.max_attempts` attempts, sleeping with exponential
/// backoff between retryable failures. Non-retryable errors are returned
/// immediately after a single attempt.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, UniProtError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, UniProtError>>,
{
    let mut operation = operation;
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(
                        "Operation succeeded on attempt {} after {} transient failures",
                        attempt,
                        attempt - 1
                    );
                }
                return Ok(result);
            }
            Err(error) => {
                if !policy.is_retryable(&error) {
                    return Err(error);
                }

                if attempt >= policy.max_attempts {
                    tracing::warn!("Operation failed after {} attempts: {}", attempt, error);
                    return Err(error);
                }

                let delay = policy.backoff_delay(attempt);
                tracing::debug!(
                    "Transient error on attempt {}: {}, retrying in {:?}",
                    attempt,
                    error,
                    delay
                );

                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 5,
            backoff_base: Duration::from_millis(1),
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
        }
    }

    fn server_error(status: u16) -> UniProtError {
        UniProtError::Api {
            status,
            url: "https://rest.uniprot.org/uniprotkb/search".to_string(),
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let call_count = Rc::new(RefCell::new(0));

        let result = {
            let call_count = call_count.clone();
            with_retry(&fast_policy(), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Ok("success")
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_transient_failures() {
        let call_count = Rc::new(RefCell::new(0));

        let result = {
            let call_count = call_count.clone();
            with_retry(&fast_policy(), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    let count = *call_count.borrow();
                    if count < 4 {
                        Err(server_error(503))
                    } else {
                        Ok("success")
                    }
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 4);
    }

    #[tokio::test]
    async fn test_retry_never_exceeds_max_attempts() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, UniProtError> = {
            let call_count = call_count.clone();
            with_retry(&fast_policy(), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Err(server_error(502))
                }
            })
        }
        .await;

        assert!(result.is_err());
        assert_eq!(*call_count.borrow(), 5);
    }

    #[tokio::test]
    async fn test_retry_returns_permanent_error_immediately() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, UniProtError> = {
            let call_count = call_count.clone();
            with_retry(&fast_policy(), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Err(server_error(400))
                }
            })
        }
        .await;

        assert!(result.is_err());
        if let Err(UniProtError::Api { status, .. }) = result {
            assert_eq!(status, 400);
        } else {
            panic!("Expected Api error");
        }
        assert_eq!(*call_count.borrow(), 1);
    }

    #[test]
    fn test_retryable_classification() {
        let policy = RetryPolicy::default();

        assert!(policy.is_retryable(&UniProtError::Network("connection refused".to_string())));
        assert!(policy.is_retryable(&server_error(500)));
        assert!(policy.is_retryable(&server_error(502)));
        assert!(policy.is_retryable(&server_error(503)));
        assert!(policy.is_retryable(&server_error(504)));

        assert!(!policy.is_retryable(&server_error(400)));
        assert!(!policy.is_retryable(&server_error(404)));
        assert!(!policy.is_retryable(&server_error(429)));
        assert!(!policy.is_retryable(&UniProtError::Parse("invalid json".to_string())));
    }

    #[test]
    fn test_backoff_strictly_increasing() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff_delay(1), Duration::from_millis(250));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(500));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(4), Duration::from_millis(2000));

        for attempt in 1..8 {
            assert!(policy.backoff_delay(attempt + 1) > policy.backoff_delay(attempt));
        }
    }
}
