//! Error taxonomy and retry classification for the ledger integration.
//!
//! Every failure surfaced to a caller is a [`LedgerError`]. Each variant carries
//! enough context (the URL involved and the underlying cause) to diagnose the
//! problem without re-running the request.
//!
//! Nothing in this workspace retries. [`RetryPolicy`] exists so that the layer
//! above can decide whether re-invoking an operation is worthwhile.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed, thread-safe error used as the `source` of transport and decode failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried by a higher layer.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means the caller
        /// applies its own back-off schedule.
        after: Option<Duration>,
    },
    /// Retrying cannot succeed without a change in configuration or credentials.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while configuring the client or reading from the remote
/// ledger service.
///
/// Any of these aborts the read entirely; callers never receive a partially
/// populated record.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The endpoint or credential configuration is malformed.
    ///
    /// Produced at construction time, before any network call is attempted.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The remote service rejected the credential, either during the OAuth2
    /// client-credentials exchange or by answering a request with 401/403.
    #[error("Authentication rejected by {url}: {message}")]
    Authentication {
        /// URL of the request that was rejected.
        url: String,
        /// Reason reported by the remote service, when available.
        message: String,
    },

    /// The request could not be sent or the connection failed.
    #[error("Request to {url} failed: {source}")]
    Transport {
        /// URL of the failed request.
        url: String,
        /// Underlying network, TLS, or timeout error.
        source: BoxError,
    },

    /// The remote service answered with a non-success status other than 401/403.
    #[error("Request to {url} returned HTTP {status}")]
    UnexpectedStatus {
        /// URL of the request.
        url: String,
        /// HTTP status code received.
        status: u16,
        /// Delay requested by the server's `Retry-After` header, if it sent one
        /// in delta-seconds form.
        retry_after: Option<Duration>,
    },

    /// The response body is not valid JSON or does not match the expected envelope.
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        /// URL whose response failed to decode.
        url: String,
        /// Underlying decode error, including the JSON path where it occurred.
        source: BoxError,
    },

    /// The caller cancelled the operation before it completed.
    #[error("Request to {url} was cancelled")]
    Cancelled {
        /// URL of the abandoned request.
        url: String,
    },
}

impl LedgerError {
    /// Convenience constructor for [`LedgerError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Classifies this error for a retrying caller.
    ///
    /// Network failures, throttling (429), and server-side errors (5xx) are
    /// transient; configuration, credential, and decode failures are not.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport { .. } => RetryPolicy::Retryable { after: None },
            Self::UnexpectedStatus {
                status,
                retry_after,
                ..
            } if *status == 429 || *status >= 500 => RetryPolicy::Retryable {
                after: *retry_after,
            },
            _ => RetryPolicy::NonRetryable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_retryable() {
        let err = LedgerError::Transport {
            url: "http://firefly.local/api/v1/about".into(),
            source: "connection refused".into(),
        };
        assert_eq!(err.retry_policy(), RetryPolicy::Retryable { after: None });
    }

    #[test]
    fn test_server_errors_are_retryable_but_client_errors_are_not() {
        let status = |status| LedgerError::UnexpectedStatus {
            url: "http://firefly.local/api/v1/about".into(),
            status,
            retry_after: None,
        };
        assert_eq!(
            status(503).retry_policy(),
            RetryPolicy::Retryable { after: None }
        );
        assert_eq!(
            status(429).retry_policy(),
            RetryPolicy::Retryable { after: None }
        );
        assert_eq!(status(404).retry_policy(), RetryPolicy::NonRetryable);
    }

    #[test]
    fn test_retry_after_is_carried_into_the_policy() {
        let throttled = LedgerError::UnexpectedStatus {
            url: "http://firefly.local/api/v1/about".into(),
            status: 429,
            retry_after: Some(Duration::from_secs(30)),
        };
        assert_eq!(
            throttled.retry_policy(),
            RetryPolicy::Retryable {
                after: Some(Duration::from_secs(30))
            }
        );

        let not_found = LedgerError::UnexpectedStatus {
            url: "http://firefly.local/api/v1/about".into(),
            status: 404,
            retry_after: Some(Duration::from_secs(30)),
        };
        assert_eq!(not_found.retry_policy(), RetryPolicy::NonRetryable);
    }

    #[test]
    fn test_configuration_and_decode_errors_are_not_retryable() {
        assert_eq!(
            LedgerError::configuration("bad endpoint").retry_policy(),
            RetryPolicy::NonRetryable
        );
        let decode = LedgerError::Decode {
            url: "http://firefly.local/api/v1/about".into(),
            source: "expected value at line 1 column 1".into(),
        };
        assert_eq!(decode.retry_policy(), RetryPolicy::NonRetryable);
    }

    #[test]
    fn test_display_includes_url_and_cause() {
        let err = LedgerError::Transport {
            url: "http://firefly.local:8000/api/v1/about".into(),
            source: "connection refused".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("http://firefly.local:8000/api/v1/about"));
        assert!(rendered.contains("connection refused"));
    }
}
