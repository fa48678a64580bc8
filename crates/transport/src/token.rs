//! Bearer token providers.
//!
//! A [`TokenProvider`] yields the complete `Authorization` header value for the
//! next request. The static variant computes it once; the client-credentials
//! variant performs an OAuth2 exchange against the ledger's token endpoint.

use async_trait::async_trait;
use ledger::{ClientId, LedgerError};
use reqwest::header::{ACCEPT, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Path of the OAuth2 token endpoint, relative to the service root.
pub const TOKEN_PATH: &str = "/oauth/token";

/// Supplies the `Authorization` header attached to every outgoing request.
#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    /// Returns a `Bearer <token>` header value, marked sensitive.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Authentication`] when the credential is rejected and
    /// [`LedgerError::Transport`] when the token endpoint cannot be reached.
    async fn authorization(&self) -> Result<HeaderValue, LedgerError>;
}

fn bearer(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

// ---------------------------------------------------------------------------
// StaticToken
// ---------------------------------------------------------------------------

/// A personal access token, sent unchanged on every request.
#[derive(Debug, Clone)]
pub struct StaticToken {
    header: HeaderValue,
}

impl StaticToken {
    /// Precomputes the header value for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Configuration`] when the token contains characters
    /// that cannot appear in an HTTP header.
    pub fn new(token: &SecretString) -> Result<Self, LedgerError> {
        let header = bearer(token.expose_secret()).map_err(|_| {
            LedgerError::configuration(
                "access_token contains characters that are not valid in an HTTP header",
            )
        })?;
        Ok(Self { header })
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn authorization(&self) -> Result<HeaderValue, LedgerError> {
        Ok(self.header.clone())
    }
}

// ---------------------------------------------------------------------------
// ClientCredentialsExchange
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: SecretString,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenErrorResponse {
    fn describe(self) -> String {
        match self.error_description {
            Some(description) => format!("{}: {description}", self.error),
            None => self.error,
        }
    }
}

/// Trades an OAuth2 client id/secret pair for a bearer token.
///
/// The exchange goes through a plain `reqwest` client, never through the
/// authenticated middleware chain. A fresh token is requested for every call.
#[derive(Debug)]
pub struct ClientCredentialsExchange {
    http: Client,
    token_url: Url,
    client_id: ClientId,
    client_secret: SecretString,
}

impl ClientCredentialsExchange {
    /// Creates an exchange against `{base_url}/oauth/token`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Configuration`] when the token URL cannot be
    /// derived from `base_url`.
    pub fn new(
        http: Client,
        base_url: &Url,
        client_id: ClientId,
        client_secret: SecretString,
    ) -> Result<Self, LedgerError> {
        let token_url = base_url.join(TOKEN_PATH).map_err(|e| {
            LedgerError::configuration(format!("cannot derive token URL from {base_url}: {e}"))
        })?;
        Ok(Self {
            http,
            token_url,
            client_id,
            client_secret,
        })
    }

    /// Returns the token endpoint this exchange posts to.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsExchange {
    #[tracing::instrument(skip(self), fields(token_url = %self.token_url, client_id = %self.client_id))]
    async fn authorization(&self) -> Result<HeaderValue, LedgerError> {
        let url = self.token_url.to_string();
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
        ];

        let response = self
            .http
            .post(self.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| LedgerError::Transport {
                url: url.clone(),
                source: Box::new(e),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| LedgerError::Transport {
            url: url.clone(),
            source: Box::new(e),
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "client-credentials exchange rejected");
            let message = serde_json::from_slice::<TokenErrorResponse>(&body)
                .map(TokenErrorResponse::describe)
                .unwrap_or_else(|_| format!("token endpoint returned HTTP {}", status.as_u16()));
            return Err(LedgerError::Authentication { url, message });
        }

        let token: TokenResponse =
            serde_json::from_slice(&body).map_err(|e| LedgerError::Authentication {
                url: url.clone(),
                message: format!("malformed token response: {e}"),
            })?;

        if !token.token_type.eq_ignore_ascii_case("bearer") {
            return Err(LedgerError::Authentication {
                url,
                message: format!("unsupported token type '{}'", token.token_type),
            });
        }

        tracing::debug!(expires_in = token.expires_in, "client-credentials exchange succeeded");
        bearer(token.access_token.expose_secret()).map_err(|_| LedgerError::Authentication {
            url,
            message: "issued access token is not a valid header value".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token_yields_bearer_header() {
        let provider = StaticToken::new(&SecretString::new("pat-123".into())).unwrap();
        let header = provider.authorization().await.unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer pat-123");
        assert!(header.is_sensitive());
    }

    #[test]
    fn test_static_token_rejects_header_breaking_characters() {
        let err = StaticToken::new(&SecretString::new("pat\r\nX-Injected: 1".into())).unwrap_err();
        assert!(matches!(err, LedgerError::Configuration { .. }));
    }

    #[test]
    fn test_static_token_debug_is_redacted() {
        let provider = StaticToken::new(&SecretString::new("very-secret".into())).unwrap();
        assert!(!format!("{provider:?}").contains("very-secret"));
    }

    #[test]
    fn test_token_url_is_derived_from_base() {
        let base = Url::parse("http://firefly.local:8000").unwrap();
        let exchange = ClientCredentialsExchange::new(
            Client::new(),
            &base,
            ClientId::new("4").unwrap(),
            SecretString::new("s".into()),
        )
        .unwrap();
        assert_eq!(
            exchange.token_url().as_str(),
            "http://firefly.local:8000/oauth/token"
        );
    }

    #[test]
    fn test_error_response_description() {
        let parsed: TokenErrorResponse = serde_json::from_str(
            r#"{"error":"invalid_client","error_description":"Client authentication failed"}"#,
        )
        .unwrap();
        assert_eq!(parsed.describe(), "invalid_client: Client authentication failed");
    }
}
