//! Per-account nonce tracking.
//!
//! The first use of an address fetches its nonce from the network; after
//! that the tracker counts locally. Call [`NonceTracker::recall`] to
//! resynchronize an address, e.g. after a failed submission.

use crate::domain::{KitError, KitResult, Transaction};
use crate::ports::AccountSource;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

pub struct NonceTracker<S: AccountSource> {
    source: S,
    nonces: Mutex<HashMap<String, u64>>,
}

impl<S: AccountSource> NonceTracker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            nonces: Mutex::new(HashMap::new()),
        }
    }

    /// Nonce to use for the next transaction of `address`, reserving it.
    pub async fn get_then_increment(&self, address: &str) -> KitResult<u64> {
        self.ensure_known(address).await?;
        let mut nonces = self.nonces.lock();
        let nonce = nonces
            .get_mut(address)
            .ok_or_else(|| KitError::UnknownNonce(address.to_string()))?;
        let current = *nonce;
        *nonce += 1;
        Ok(current)
    }

    /// Current nonce of `address`, fetching it on first use.
    pub async fn get(&self, address: &str) -> KitResult<u64> {
        self.ensure_known(address).await?;
        self.nonces
            .lock()
            .get(address)
            .copied()
            .ok_or_else(|| KitError::UnknownNonce(address.to_string()))
    }

    /// Re-fetch the nonce of `address` from the network.
    pub async fn recall(&self, address: &str) -> KitResult<u64> {
        let nonce = self.source.account_nonce(address).await?;
        debug!(address, nonce, "recalled nonce");
        self.nonces.lock().insert(address.to_string(), nonce);
        Ok(nonce)
    }

    /// Advance the local nonce of an already tracked address.
    pub fn increment(&self, address: &str) -> KitResult<()> {
        let mut nonces = self.nonces.lock();
        let nonce = nonces
            .get_mut(address)
            .ok_or_else(|| KitError::UnknownNonce(address.to_string()))?;
        *nonce += 1;
        Ok(())
    }

    /// Assign the sender's next nonce to `tx`.
    pub async fn apply_nonce(&self, tx: &mut Transaction) -> KitResult<()> {
        tx.nonce = self.get_then_increment(&tx.sender).await?;
        Ok(())
    }

    async fn ensure_known(&self, address: &str) -> KitResult<()> {
        if self.nonces.lock().contains_key(address) {
            return Ok(());
        }

        let nonce = self.source.account_nonce(address).await?;
        debug!(address, nonce, "fetched nonce");
        // Another task may have fetched it meanwhile; keep the local count.
        self.nonces
            .lock()
            .entry(address.to_string())
            .or_insert(nonce);
        Ok(())
    }
}
