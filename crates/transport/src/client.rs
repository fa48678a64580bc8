//! The HTTP client bound to an [`AuthenticatedTransport`].

use std::sync::Arc;

use ledger::{Credential, EndpointConfig, LedgerError};
use reqwest::{Client, Method, Response, Url};
use reqwest_middleware::{ClientWithMiddleware, Middleware};

use crate::{AuthenticatedTransport, ClientCredentialsExchange, StaticToken, TokenProvider, retarget};

/// Origin that relative requests are built against before the transport
/// addresses them. Never reaches the network.
const UNRESOLVED_ORIGIN: &str = "http://unresolved.invalid/";

fn relative(path: &str) -> Result<Url, LedgerError> {
    Url::parse(UNRESOLVED_ORIGIN)
        .and_then(|origin| origin.join(path))
        .map_err(|e| LedgerError::configuration(format!("invalid request path '{path}': {e}")))
}

fn into_ledger_error(url: &Url, err: reqwest_middleware::Error) -> LedgerError {
    match err {
        // Errors raised by our own middleware (token exchange) keep their kind.
        reqwest_middleware::Error::Middleware(err) => match err.downcast::<LedgerError>() {
            Ok(err) => err,
            Err(other) => LedgerError::Transport {
                url: url.to_string(),
                source: other.into(),
            },
        },
        reqwest_middleware::Error::Reqwest(err) => LedgerError::Transport {
            url: url.to_string(),
            source: Box::new(err),
        },
    }
}

// ---------------------------------------------------------------------------
// LedgerClient
// ---------------------------------------------------------------------------

/// Immutable handle for issuing authenticated requests to one ledger instance.
///
/// Cheap to clone; clones share the same connection pool and transport.
#[derive(Clone)]
pub struct LedgerClient {
    inner: ClientWithMiddleware,
    base_url: Url,
}

impl LedgerClient {
    /// Builds a client with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Configuration`] if the endpoint cannot be parsed
    /// or the credential cannot be turned into a header.
    pub fn new(config: EndpointConfig) -> Result<Self, LedgerError> {
        Self::builder(config).build()
    }

    /// Starts a builder for customising the underlying client or middleware chain.
    pub fn builder(config: EndpointConfig) -> LedgerClientBuilder {
        LedgerClientBuilder {
            config,
            http: None,
            extra: Vec::new(),
        }
    }

    /// Returns the configured endpoint.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the absolute URL a request for `path` is sent to.
    pub fn resolve(&self, path: &str) -> Result<Url, LedgerError> {
        let mut url = relative(path)?;
        retarget(&self.base_url, &mut url);
        Ok(url)
    }

    /// Sends a request for the service-relative `path`.
    ///
    /// The response is returned whatever its status; interpreting it is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Transport`] when the request cannot be sent, or the
    /// token provider's error when authorization fails.
    pub async fn execute(&self, method: Method, path: &str) -> Result<Response, LedgerError> {
        let url = self.resolve(path)?;
        self.inner
            .request(method, relative(path)?)
            .send()
            .await
            .map_err(|e| into_ledger_error(&url, e))
    }

    /// Shorthand for [`execute`](Self::execute) with `GET`.
    pub async fn get(&self, path: &str) -> Result<Response, LedgerError> {
        self.execute(Method::GET, path).await
    }
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// LedgerClientBuilder
// ---------------------------------------------------------------------------

/// Builder for [`LedgerClient`].
pub struct LedgerClientBuilder {
    config: EndpointConfig,
    http: Option<Client>,
    extra: Vec<Arc<dyn Middleware>>,
}

impl LedgerClientBuilder {
    /// Uses `http` as the underlying transport instead of a default client.
    ///
    /// The configured timeout is not applied to a supplied client.
    #[must_use]
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Appends a middleware that runs after authentication, immediately before
    /// the request is sent.
    #[must_use]
    pub fn with<M: Middleware>(mut self, middleware: M) -> Self {
        self.extra.push(Arc::new(middleware));
        self
    }

    /// Parses the endpoint, selects the token provider and assembles the chain.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Configuration`] on an unparseable endpoint, an
    /// access token that is not a valid header value, or a client that cannot
    /// be constructed.
    pub fn build(self) -> Result<LedgerClient, LedgerError> {
        let (endpoint, credential, timeout) = self.config.into_parts();
        let base_url = Url::parse(endpoint.as_str()).map_err(|e| {
            LedgerError::configuration(format!("cannot parse endpoint '{endpoint}': {e}"))
        })?;

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| {
                    LedgerError::configuration(format!("cannot construct HTTP client: {e}"))
                })?
            }
        };

        let credential_kind = credential.kind();
        let tokens: Arc<dyn TokenProvider> = match credential {
            Credential::AccessToken(token) => Arc::new(StaticToken::new(&token)?),
            Credential::ClientCredentials {
                client_id,
                client_secret,
            } => Arc::new(ClientCredentialsExchange::new(
                http.clone(),
                &base_url,
                client_id,
                client_secret,
            )?),
        };

        let mut chain = reqwest_middleware::ClientBuilder::new(http)
            .with(AuthenticatedTransport::new(base_url.clone(), tokens));
        for middleware in self.extra {
            chain = chain.with_arc(middleware);
        }

        tracing::debug!(base_url = %base_url, credential = credential_kind, "ledger client constructed");
        Ok(LedgerClient {
            inner: chain.build(),
            base_url,
        })
    }
}
