//! The authenticated transport: a `reqwest-middleware` layer that addresses
//! relative requests to the configured endpoint and authorizes them.

use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use reqwest::header::AUTHORIZATION;
use reqwest::{Request, Response, Url};
use reqwest_middleware::{Middleware, Next};

use crate::TokenProvider;

/// Replaces the scheme, host and port of `target` with those of `base`,
/// keeping its path, query and fragment.
pub fn retarget(base: &Url, target: &mut Url) {
    let mut resolved = base.clone();
    resolved.set_path(target.path());
    resolved.set_query(target.query());
    resolved.set_fragment(target.fragment());
    *target = resolved;
}

/// Rewrites every outgoing request onto the configured endpoint and attaches
/// an `Authorization` header from its [`TokenProvider`].
///
/// Holds only what it captured at construction; it is safe to share between
/// concurrent requests. Responses and downstream errors pass through untouched.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl AuthenticatedTransport {
    /// Creates a transport for an already-parsed base URL.
    pub fn new(base_url: Url, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { base_url, tokens }
    }

    /// Returns the base URL requests are addressed to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl std::fmt::Debug for AuthenticatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Middleware for AuthenticatedTransport {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        retarget(&self.base_url, req.url_mut());

        let authorization = self
            .tokens
            .authorization()
            .await
            .map_err(reqwest_middleware::Error::middleware)?;
        req.headers_mut().insert(AUTHORIZATION, authorization);

        tracing::trace!(method = %req.method(), url = %req.url(), "dispatching authenticated request");
        next.run(req, extensions).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_retarget_replaces_scheme_and_host_only() {
        let base = url("https://firefly.local:8443");
        let mut target = url("http://unresolved.invalid/api/v1/about?page=2&limit=5");
        retarget(&base, &mut target);
        assert_eq!(
            target.as_str(),
            "https://firefly.local:8443/api/v1/about?page=2&limit=5"
        );
    }

    #[test]
    fn test_retarget_drops_port_when_base_has_none() {
        let base = url("http://firefly.local");
        let mut target = url("http://other.host:9999/api/v1/about");
        retarget(&base, &mut target);
        assert_eq!(target.as_str(), "http://firefly.local/api/v1/about");
        assert_eq!(target.port(), None);
    }

    #[test]
    fn test_retarget_holds_across_endpoints_and_paths() {
        let bases = [
            "http://firefly.local",
            "http://firefly.local:8000",
            "https://ledger.example.com",
            "https://127.0.0.1:4443",
        ];
        let targets = [
            "http://unresolved.invalid/",
            "http://unresolved.invalid/api/v1/about",
            "https://somewhere.else:1/api/v1/accounts?type=asset",
            "http://unresolved.invalid/api/v1/transactions?start=2024-01-01&end=2024-12-31",
        ];
        for base in bases {
            let base = url(base);
            for target in targets {
                let original = url(target);
                let mut rewritten = original.clone();
                retarget(&base, &mut rewritten);
                assert_eq!(rewritten.scheme(), base.scheme());
                assert_eq!(rewritten.host_str(), base.host_str());
                assert_eq!(rewritten.port_or_known_default(), base.port_or_known_default());
                assert_eq!(rewritten.path(), original.path());
                assert_eq!(rewritten.query(), original.query());
            }
        }
    }
}
