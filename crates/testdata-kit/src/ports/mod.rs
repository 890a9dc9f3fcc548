//! Ports the kit depends on.

use crate::domain::KitResult;
use async_trait::async_trait;

/// Source of on-chain account state.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Current nonce of the account identified by its bech32 address.
    async fn account_nonce(&self, address: &str) -> KitResult<u64>;
}
