//! Port traits implemented by infrastructure crates.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{LedgerError, SystemInfo};

/// Source of [`SystemInfo`] snapshots for one remote ledger instance.
///
/// Implementations are read-only and idempotent: calling
/// [`system_info`](Self::system_info) repeatedly against unchanged remote state
/// yields identical records.
#[async_trait]
pub trait SystemInfoSource: Send + Sync {
    /// Fetches the current snapshot.
    ///
    /// Cancelling `cancel` abandons the in-flight request and yields
    /// [`LedgerError::Cancelled`].
    async fn system_info(&self, cancel: &CancellationToken) -> Result<SystemInfo, LedgerError>;
}
