//! Provider configuration: the raw settings supplied by the host tool and the
//! validated, immutable [`EndpointConfig`] built from them.
//!
//! Exactly one credential variant is active per session. [`ProviderSettings`]
//! is the loose shape the host hands over (every credential field optional);
//! [`ProviderSettings::into_endpoint_config`] is the single place where that
//! shape is checked and turned into a [`Credential`].

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{ClientId, Endpoint, LedgerError};

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// How requests to the ledger service are authenticated.
///
/// Secrets are held in [`SecretString`] so they are redacted from `Debug`
/// output and zeroed on drop.
#[derive(Debug)]
pub enum Credential {
    /// A long-lived personal access token sent as `Authorization: Bearer <token>`.
    AccessToken(SecretString),

    /// An OAuth2 client id/secret pair traded for a bearer token via the
    /// client-credentials grant before each request.
    ClientCredentials {
        /// OAuth2 client identifier.
        client_id: ClientId,
        /// OAuth2 client secret.
        client_secret: SecretString,
    },
}

impl Credential {
    /// Short, non-secret label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccessToken(_) => "access_token",
            Self::ClientCredentials { .. } => "client_credentials",
        }
    }
}

// ---------------------------------------------------------------------------
// EndpointConfig
// ---------------------------------------------------------------------------

/// Validated configuration for one provider session.
///
/// Created once from host-supplied settings and never mutated afterwards.
/// Construction consumes it, so each client owns its own copy of the credential.
#[derive(Debug)]
pub struct EndpointConfig {
    endpoint: Endpoint,
    credential: Credential,
    timeout: Option<Duration>,
}

impl EndpointConfig {
    /// Creates a configuration with no request timeout.
    pub fn new(endpoint: Endpoint, credential: Credential) -> Self {
        Self {
            endpoint,
            credential,
            timeout: None,
        }
    }

    /// Bounds every request made with this configuration.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the validated base URL.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the active credential.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Returns the per-request timeout, if one was configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Splits the configuration into its parts.
    pub fn into_parts(self) -> (Endpoint, Credential, Option<Duration>) {
        (self.endpoint, self.credential, self.timeout)
    }
}

// ---------------------------------------------------------------------------
// ProviderSettings
// ---------------------------------------------------------------------------

/// Settings as supplied by the host tool, before validation.
///
/// Field names match the host's attribute names (`endpoint`, `access_token`,
/// `client_id`, `client_secret`) so the struct can be deserialized directly
/// from its configuration sources.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderSettings {
    /// Base URL of the ledger instance, such as `http://firefly.local:8000`.
    pub endpoint: String,

    /// Personal access token. Mutually exclusive with the client-credential pair.
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// OAuth2 client identifier; requires `client_secret`.
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth2 client secret; requires `client_id`.
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// Optional per-request timeout in seconds. Must be positive when set.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProviderSettings {
    /// Validates the settings and selects the credential variant.
    ///
    /// Empty strings count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Configuration`] when the endpoint is malformed,
    /// when both or neither credential variants are supplied, when only half
    /// of the client-credential pair is supplied, or when `timeout_secs` is zero.
    pub fn into_endpoint_config(self) -> Result<EndpointConfig, LedgerError> {
        let endpoint = Endpoint::new(self.endpoint)?;

        let access_token = self.access_token.filter(|t| !t.expose_secret().is_empty());
        let client_id = self.client_id.and_then(ClientId::new);
        let client_secret = self.client_secret.filter(|s| !s.expose_secret().is_empty());

        let credential = match (access_token, client_id, client_secret) {
            (Some(token), None, None) => Credential::AccessToken(token),
            (None, Some(client_id), Some(client_secret)) => Credential::ClientCredentials {
                client_id,
                client_secret,
            },
            (None, None, None) => {
                return Err(LedgerError::configuration(
                    "either access_token or client_id/client_secret must be set",
                ));
            }
            (Some(_), _, _) => {
                return Err(LedgerError::configuration(
                    "access_token cannot be combined with client_id/client_secret",
                ));
            }
            (None, Some(_), None) => {
                return Err(LedgerError::configuration(
                    "client_id requires client_secret",
                ));
            }
            (None, None, Some(_)) => {
                return Err(LedgerError::configuration(
                    "client_secret requires client_id",
                ));
            }
        };

        let mut config = EndpointConfig::new(endpoint, credential);
        match self.timeout_secs {
            Some(0) => {
                return Err(LedgerError::configuration(
                    "timeout_secs must be greater than zero",
                ));
            }
            Some(secs) => config = config.with_timeout(Duration::from_secs(secs)),
            None => {}
        }

        tracing::debug!(
            endpoint = %config.endpoint(),
            credential = config.credential().kind(),
            "provider settings validated"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::new(value.to_string()))
    }

    fn settings(endpoint: &str) -> ProviderSettings {
        ProviderSettings {
            endpoint: endpoint.to_string(),
            ..ProviderSettings::default()
        }
    }

    #[test]
    fn test_access_token_selects_bearer_variant() {
        let config = ProviderSettings {
            access_token: secret("pat-123"),
            ..settings("http://firefly.local:8000")
        }
        .into_endpoint_config()
        .unwrap();

        assert_eq!(config.endpoint().as_str(), "http://firefly.local:8000");
        match config.credential() {
            Credential::AccessToken(token) => assert_eq!(token.expose_secret(), "pat-123"),
            other => panic!("unexpected credential {other:?}"),
        }
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_client_pair_selects_client_credentials_variant() {
        let config = ProviderSettings {
            client_id: Some("3".into()),
            client_secret: secret("s3cr3t"),
            timeout_secs: Some(15),
            ..settings("https://firefly.local")
        }
        .into_endpoint_config()
        .unwrap();

        match config.credential() {
            Credential::ClientCredentials {
                client_id,
                client_secret,
            } => {
                assert_eq!(client_id.as_str(), "3");
                assert_eq!(client_secret.expose_secret(), "s3cr3t");
            }
            other => panic!("unexpected credential {other:?}"),
        }
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_missing_scheme_is_a_configuration_error() {
        let err = ProviderSettings {
            access_token: secret("pat"),
            ..settings("firefly.local")
        }
        .into_endpoint_config()
        .unwrap_err();
        assert!(matches!(err, LedgerError::Configuration { .. }));
    }

    #[test]
    fn test_credential_must_be_exactly_one_variant() {
        let none = settings("http://firefly.local").into_endpoint_config();
        assert!(matches!(none, Err(LedgerError::Configuration { .. })));

        let both = ProviderSettings {
            access_token: secret("pat"),
            client_id: Some("1".into()),
            client_secret: secret("s"),
            ..settings("http://firefly.local")
        }
        .into_endpoint_config();
        assert!(matches!(both, Err(LedgerError::Configuration { .. })));

        let half = ProviderSettings {
            client_id: Some("1".into()),
            ..settings("http://firefly.local")
        }
        .into_endpoint_config();
        assert!(matches!(half, Err(LedgerError::Configuration { .. })));

        let other_half = ProviderSettings {
            client_secret: secret("s"),
            ..settings("http://firefly.local")
        }
        .into_endpoint_config();
        assert!(matches!(other_half, Err(LedgerError::Configuration { .. })));
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let err = ProviderSettings {
            access_token: secret(""),
            ..settings("http://firefly.local")
        }
        .into_endpoint_config()
        .unwrap_err();
        assert!(err.to_string().contains("either access_token"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = ProviderSettings {
            access_token: secret("pat"),
            timeout_secs: Some(0),
            ..settings("http://firefly.local")
        }
        .into_endpoint_config()
        .unwrap_err();
        assert!(matches!(err, LedgerError::Configuration { .. }));
    }

    #[test]
    fn test_settings_deserialize_from_host_attribute_names() {
        let settings: ProviderSettings = serde_json::from_str(
            r#"{"endpoint":"http://firefly.local","access_token":"pat-9"}"#,
        )
        .unwrap();
        let config = settings.into_endpoint_config().unwrap();
        assert_eq!(config.credential().kind(), "access_token");
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let config = ProviderSettings {
            access_token: secret("do-not-print"),
            ..settings("http://firefly.local")
        }
        .into_endpoint_config()
        .unwrap();
        assert!(!format!("{config:?}").contains("do-not-print"));
    }
}
