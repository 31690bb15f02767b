//! Generic HTTP helpers for the built-in transports
//!
//! Each transport signs and builds its own `RequestBuilder`; this module owns
//! the part they share: sending, logging, status classification and retry.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ClientError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns `(status, body)`.
    ///
    /// Timeouts map to [`ClientError::Timeout`], connection failures and
    /// 502/503/504 to [`ClientError::Network`], HTTP 429 to
    /// [`ClientError::RateLimited`]. Every other status is returned to the
    /// caller, which knows the vendor's error body format.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        description: &str,
    ) -> Result<(u16, String), ClientError> {
        log::debug!("[{provider_name}] {description}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(e.to_string())
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{provider_name}] Response Status: {status_code}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ClientError::RateLimited {
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Server error (HTTP {status_code})");
            return Err(ClientError::Network(format!(
                "HTTP {status_code}: {}",
                truncate_for_log(&body)
            )));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response body: {e}")))?;

        log::debug!(
            "[{provider_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON body, logging the raw text on failure.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ClientError::Parse(e.to_string())
        })
    }

    /// [`execute_request`](Self::execute_request) with retries.
    ///
    /// Only transient failures are retried (network, timeout, rate limit),
    /// with exponential backoff: 100ms, 200ms, 400ms, ... capped at 10s.
    /// A `Retry-After` hint wins over the backoff, capped at 30s.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        description: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ClientError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, provider_name, description).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, provider_name, description).await;
            };

            match Self::execute_request(req, provider_name, description).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        provider_name,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ClientError::Network("All retries exhausted with no error captured".to_string())
        }))
    }
}

fn retry_delay(error: &ClientError, attempt: u32) -> Duration {
    if let ClientError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
