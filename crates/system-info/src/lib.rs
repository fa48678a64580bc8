//! System information read for the Firefly ledger.
//!
//! Implements [`ledger::SystemInfoSource`] by issuing `GET /api/v1/about`
//! through a [`transport::LedgerClient`], decoding the `{"data": {...}}`
//! envelope and copying its fields into a [`ledger::SystemInfo`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Response status handling, envelope decoding and field
//! mapping live here. Addressing and authentication are the transport's job.

mod envelope;
mod fetcher;

pub use envelope::{Envelope, EnvelopeError, decode_envelope};
pub use fetcher::{ABOUT_PATH, SystemInfoFetcher};
