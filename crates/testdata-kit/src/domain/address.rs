//! Account addresses.
//!
//! Bech32 encoding belongs to the signing SDK; an [`Address`] pairs the
//! bech32 string used on the wire with the raw public key needed when an
//! address is embedded in transaction data.

use crate::domain::error::{KitError, KitResult};
use std::fmt;

/// Bech32 form of the all-zero address, receiver of contract deployments.
pub const CONTRACT_DEPLOY_ADDRESS: &str =
    "erd1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq6gq4hu";

const PUBKEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    bech32: String,
    pubkey: [u8; PUBKEY_LEN],
}

impl Address {
    pub fn new(bech32: impl Into<String>, pubkey: [u8; PUBKEY_LEN]) -> KitResult<Self> {
        let bech32 = bech32.into();
        if bech32.trim().is_empty() {
            return Err(KitError::InvalidAddress("empty bech32 string".into()));
        }
        Ok(Self { bech32, pubkey })
    }

    /// Build from a bech32 string and the hex-encoded public key.
    pub fn from_hex(bech32: impl Into<String>, pubkey_hex: &str) -> KitResult<Self> {
        let bytes = hex::decode(pubkey_hex)
            .map_err(|e| KitError::InvalidAddress(format!("{pubkey_hex}: {e}")))?;
        let pubkey: [u8; PUBKEY_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            KitError::InvalidAddress(format!("expected {PUBKEY_LEN} bytes, got {}", b.len()))
        })?;
        Self::new(bech32, pubkey)
    }

    /// Receiver of contract deployments.
    pub fn deploy_target() -> Self {
        Self {
            bech32: CONTRACT_DEPLOY_ADDRESS.to_string(),
            pubkey: [0u8; PUBKEY_LEN],
        }
    }

    pub fn bech32(&self) -> &str {
        &self.bech32
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.pubkey)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bech32)
    }
}
