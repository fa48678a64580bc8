//! Validated newtypes for configuration values.
//!
//! Raw strings from the host tool are wrapped once, at configuration time, so
//! that downstream code can rely on their invariants without re-checking them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Accepted endpoint shape: scheme and host with an optional port, nothing else.
static ENDPOINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^:/]+(:\d+)?$").expect("endpoint pattern is a valid regex")
});

/// The same shape with a host that cannot carry a query, fragment, userinfo,
/// or whitespace.
static PLAIN_HOST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^:/?#@\s]+(:\d+)?$").expect("plain host pattern is a valid regex")
});

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Base URL of the remote ledger service, such as `http://firefly.local:8000`.
///
/// Always matches `scheme://host[:port]` with an `http` or `https` scheme and
/// no path, query, or trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    /// Validates and wraps an endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Configuration`] when `value` does not match
    /// `^https?://[^:/]+(:\d+)?$`, or when its host part contains a query,
    /// fragment, userinfo, or whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, LedgerError> {
        let value = value.into();
        if ENDPOINT_PATTERN.is_match(&value) && PLAIN_HOST_PATTERN.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(LedgerError::configuration(format!(
                "endpoint '{value}' must be a URL, like http://firefly.local or http://firefly.local:8000"
            )))
        }
    }

    /// Returns the endpoint as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Endpoint {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ClientId
// ---------------------------------------------------------------------------

/// OAuth2 client identifier used in the client-credentials exchange.
///
/// Not secret; the paired client secret is held separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new client identifier, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() { None } else { Some(Self(v)) }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| LedgerError::configuration("client_id must not be empty"))
    }
}

impl From<ClientId> for String {
    fn from(client_id: ClientId) -> Self {
        client_id.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
