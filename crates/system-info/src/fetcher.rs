//! Reads the `/api/v1/about` snapshot.

use std::time::Duration;

use async_trait::async_trait;
use ledger::{LedgerError, SystemInfo, SystemInfoSource};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use transport::LedgerClient;

use crate::decode_envelope;

/// Service-relative path of the system information resource.
pub const ABOUT_PATH: &str = "/api/v1/about";

/// Reads a delta-seconds `Retry-After` header. HTTP-date values are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}

/// Wire shape of the `data` object. Older servers report the runtime version
/// as `php_version`, newer ones as `platform_version`.
#[derive(Debug, Deserialize)]
struct AboutData {
    version: String,
    api_version: String,
    #[serde(alias = "platform_version")]
    php_version: String,
    os: String,
    driver: String,
}

impl From<AboutData> for SystemInfo {
    fn from(about: AboutData) -> Self {
        Self {
            version: about.version,
            api_version: about.api_version,
            platform_version: about.php_version,
            os: about.os,
            db_driver: about.driver,
        }
    }
}

/// Fetches [`SystemInfo`] from one ledger instance.
///
/// Stateless apart from the client it was built with; every call performs one
/// round trip and never mutates the remote resource.
#[derive(Debug, Clone)]
pub struct SystemInfoFetcher {
    client: LedgerClient,
}

impl SystemInfoFetcher {
    /// Creates a fetcher that sends its requests through `client`.
    pub fn new(client: LedgerClient) -> Self {
        Self { client }
    }

    /// Performs `GET /api/v1/about` and maps the response.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Transport`] when the request cannot be sent or the body
    ///   cannot be read.
    /// - [`LedgerError::Authentication`] on 401/403 or a rejected token exchange.
    /// - [`LedgerError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`LedgerError::Decode`] when the body is not the expected envelope.
    /// - [`LedgerError::Cancelled`] when `cancel` fires first.
    #[tracing::instrument(skip_all, fields(endpoint = %self.client.base_url()))]
    pub async fn fetch(&self, cancel: &CancellationToken) -> Result<SystemInfo, LedgerError> {
        let url = self.client.resolve(ABOUT_PATH)?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("system info read cancelled");
                Err(LedgerError::Cancelled { url: url.to_string() })
            }
            result = self.read(&url) => result,
        }
    }

    async fn read(&self, url: &Url) -> Result<SystemInfo, LedgerError> {
        let response = self.client.get(ABOUT_PATH).await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(LedgerError::Authentication {
                url: url.to_string(),
                message: format!("server answered {status}"),
            });
        }
        if !status.is_success() {
            return Err(LedgerError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
                retry_after: retry_after(response.headers()),
            });
        }

        let body = response.bytes().await.map_err(|e| LedgerError::Transport {
            url: url.to_string(),
            source: Box::new(e),
        })?;
        let about: AboutData = decode_envelope(&body).map_err(|e| LedgerError::Decode {
            url: url.to_string(),
            source: Box::new(e),
        })?;

        tracing::trace!(?about, "read system info");
        Ok(about.into())
    }
}

#[async_trait]
impl SystemInfoSource for SystemInfoFetcher {
    async fn system_info(&self, cancel: &CancellationToken) -> Result<SystemInfo, LedgerError> {
        self.fetch(cancel).await
    }
}
