//! Shared HTTP request plumbing
//!
//! Sends a prepared `RequestBuilder`, logs it, classifies transport failures
//! and retries the transient ones. Pi-hole specific status handling (401,
//! error bodies) stays in [`crate::client`].

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::PiholeError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Default number of transport retries per request.
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

const BACKOFF_BASE: Duration = Duration::from_millis(100);
const BACKOFF_CAP: Duration = Duration::from_secs(10);
const RETRY_AFTER_CAP_SECS: u64 = 30;

pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Sends one request and returns `(status, body)`.
    ///
    /// Statuses the transport treats as transient never reach the caller as
    /// `Ok`: 429 becomes `RateLimited`, 502..=504 become `NetworkError`.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
    ) -> Result<(u16, String), PiholeError> {
        log::debug!("[pihole] {method_name} {path}");

        let response = request_builder.send().await.map_err(send_error)?;
        let status = response.status().as_u16();
        let retry_after = retry_after_secs(&response);
        log::debug!("[pihole] {method_name} {path} -> HTTP {status}");

        let body = response.text().await.map_err(|e| PiholeError::NetworkError {
            detail: format!("Failed to read response body: {e}"),
        })?;
        log::debug!("[pihole] Response Body: {}", truncate_for_log(&body));

        match status {
            429 => {
                log::warn!("[pihole] {method_name} {path} rate limited, retry_after={retry_after:?}");
                Err(PiholeError::RateLimited {
                    retry_after,
                    raw_message: Some(body).filter(|b| !b.is_empty()),
                })
            }
            502..=504 => {
                log::warn!("[pihole] {method_name} {path} gateway error (HTTP {status})");
                Err(PiholeError::NetworkError {
                    detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
                })
            }
            _ => Ok((status, body)),
        }
    }

    /// Decodes a JSON body, mapping failures to `ParseError`.
    pub fn parse_json<T>(body: &str) -> Result<T, PiholeError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(body).map_err(|e| {
            log::error!("[pihole] Unexpected response shape ({e}): {}", truncate_for_log(body));
            PiholeError::ParseError {
                detail: e.to_string(),
            }
        })
    }

    /// [`execute_request`](Self::execute_request) with up to `max_retries`
    /// extra attempts for transport failures.
    ///
    /// Backoff starts at 100ms and doubles up to 10s. A 429 with
    /// `Retry-After` waits that long instead, at most 30s.
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
        max_retries: u32,
    ) -> Result<(u16, String), PiholeError> {
        let mut attempt = 0;
        loop {
            // Requests with streaming bodies cannot be cloned; send those once.
            let Some(request) = request_builder.try_clone() else {
                return Self::execute_request(request_builder, method_name, path).await;
            };

            let err = match Self::execute_request(request, method_name, path).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };
            if attempt >= max_retries || !is_retryable(&err) {
                return Err(err);
            }

            let delay = retry_delay(&err, attempt);
            attempt += 1;
            log::warn!(
                "[pihole] {method_name} {path} failed ({err}), retry {attempt}/{max_retries} in {}ms",
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn send_error(e: reqwest::Error) -> PiholeError {
    let detail = e.to_string();
    if e.is_timeout() {
        PiholeError::Timeout { detail }
    } else {
        PiholeError::NetworkError { detail }
    }
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Transport-level failures only; business errors are never retried here.
pub(crate) fn is_retryable(error: &PiholeError) -> bool {
    matches!(
        error,
        PiholeError::NetworkError { .. }
            | PiholeError::Timeout { .. }
            | PiholeError::RateLimited { .. }
    )
}

fn retry_delay(error: &PiholeError, attempt: u32) -> Duration {
    match error {
        PiholeError::RateLimited {
            retry_after: Some(secs),
            ..
        } => Duration::from_secs((*secs).min(RETRY_AFTER_CAP_SECS)),
        _ => backoff_delay(attempt),
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE
        .checked_mul(2_u32.saturating_pow(attempt))
        .map_or(BACKOFF_CAP, |d| d.min(BACKOFF_CAP))
}
