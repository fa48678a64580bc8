//! Domain layer for the Firefly ledger integration.
//!
//! This crate contains the configuration model handed over by the host tool,
//! the credential union, the [`SystemInfo`] record, and the error taxonomy used
//! by every other crate in the workspace. Infrastructure crates implement the
//! [`SystemInfoSource`] port defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Validated newtypes (`Endpoint`, `ClientId`) |
//! | [`config`] | Host-supplied settings and the immutable `EndpointConfig` |
//! | [`types`] | The `SystemInfo` record |
//! | [`errors`] | `LedgerError` and its retry classification |
//! | [`ports`] | Traits implemented by infrastructure crates |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{Credential, EndpointConfig, ProviderSettings};
pub use errors::{BoxError, LedgerError, RetryPolicy};
pub use identifiers::{ClientId, Endpoint};
pub use ports::SystemInfoSource;
pub use types::SystemInfo;
