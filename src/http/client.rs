//! Low-level HTTP client for an indy-vdr-proxy gateway.
//!
//! Returns raw status and body text; mapping to ledger semantics happens in
//! [`ProxyTransport`](crate::pool::proxy::ProxyTransport).

use std::time::Duration;

use reqwest::{Client, Method};

use crate::error::TransportError;
use crate::http::retry::RetryPolicy;

/// Raw proxy answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: String,
}

impl ProxyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct ProxyHttp {
    base_url: String,
    client: Client,
}

impl ProxyHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET returning the body of a 2xx answer; anything else is an error.
    pub async fn get(&self, path: &str, retry: &RetryPolicy) -> Result<String, TransportError> {
        let url = self.url(path);
        let response = self.request_with_retry(Method::GET, &url, None, retry).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(TransportError::Proxy {
                status: response.status,
                body: response.body,
            })
        }
    }

    /// Single-shot POST. The caller interprets the status.
    pub async fn post(&self, path: &str, body: Vec<u8>) -> Result<ProxyResponse, TransportError> {
        let url = self.url(path);
        self.do_request(&Method::POST, &url, Some(body)).await
    }

    async fn request_with_retry(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        retry: &RetryPolicy,
    ) -> Result<ProxyResponse, TransportError> {
        let Some(config) = retry.config() else {
            return self.do_request(&method, url, body).await;
        };

        let mut last_error = None;
        for attempt in 0..=config.max_retries {
            let outcome = match self.do_request(&method, url, body.clone()).await {
                Ok(response) if config.retryable_statuses.contains(&response.status) => {
                    Err(TransportError::Proxy {
                        status: response.status,
                        body: response.body,
                    })
                }
                other => other,
            };
            match outcome {
                Ok(response) => return Ok(response),
                Err(e) if config.is_retryable(&e) && attempt < config.max_retries => {
                    let delay = config.delay_for_attempt(attempt);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying proxy request to {}",
                        url
                    );
                    futures_timer::Delay::new(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(TransportError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request(
        &self,
        method: &Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ProxyResponse, TransportError> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(bytes) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ProxyResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let http = ProxyHttp::new("http://127.0.0.1:3030/", Duration::from_secs(5)).unwrap();
        assert_eq!(http.base_url(), "http://127.0.0.1:3030");
        assert_eq!(http.url("/submit"), "http://127.0.0.1:3030/submit");
        assert_eq!(http.url(""), "http://127.0.0.1:3030/");
    }
}
