use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 2,
            delay: Duration::from_millis(500),
        }
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Sends a request until it yields a non-transient response or the policy
/// runs out. Connection errors and 429/5xx responses are retried.
pub async fn send_with_retry<F, Fut>(mut send: F, policy: RetryPolicy) -> reqwest::Result<Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = reqwest::Result<Response>>,
{
    let mut attempt = 0;
    loop {
        let result = send().await;
        let retry = match &result {
            Ok(response) => is_transient(response.status()),
            Err(e) => e.is_connect() || e.is_timeout(),
        };
        if !retry || attempt >= policy.retries {
            return result;
        }
        attempt += 1;
        debug!(attempt, retries = policy.retries, "Transient failure, retrying");
        tokio::time::sleep(policy.delay).await;
    }
}
