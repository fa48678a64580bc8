//! Authenticated HTTP transport for the Firefly ledger API.
//!
//! Callers build requests against paths relative to the service root
//! (`/api/v1/about`). The [`AuthenticatedTransport`] middleware rewrites each
//! request onto the configured endpoint and attaches an `Authorization`
//! header before handing it to the underlying `reqwest` client.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL addressing, credential handling and the OAuth2
//! client-credentials exchange live here. Consumers see a [`LedgerClient`]
//! and [`ledger::LedgerError`]; they never touch `reqwest-middleware` errors.
//!
//! ## Credentials
//!
//! | [`ledger::Credential`] | [`TokenProvider`] |
//! |------------------------|-------------------|
//! | `AccessToken` | [`StaticToken`]: header computed once at construction |
//! | `ClientCredentials` | [`ClientCredentialsExchange`]: token exchanged per request |
//!
//! The transport performs no retries, logs no secrets and caches nothing.

mod client;
mod middleware;
mod token;

pub use client::{LedgerClient, LedgerClientBuilder};
pub use middleware::{AuthenticatedTransport, retarget};
pub use token::{ClientCredentialsExchange, StaticToken, TOKEN_PATH, TokenProvider};
