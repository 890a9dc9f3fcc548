//! # Testdata Kit
//!
//! Helpers used when populating a local network with data for Rosetta
//! checks.
//!
//! - [`TransactionFactory`] builds unsigned transfer, deploy, call and
//!   relayed transactions with the network's gas rules.
//! - [`NonceTracker`] hands out per-account nonces, fetched once from the
//!   proxy through an [`AccountSource`].
//! - [`Memento`] remembers contracts and token identifiers between runs.
//!
//! Signing is left to the caller.

pub mod adapters;
pub mod domain;
pub mod factory;
pub mod memento;
pub mod nonce;
pub mod ports;

pub use adapters::ProxyAccountSource;
pub use domain::{
    Address, ContractArg, KitError, KitResult, TokenTransfer, Transaction, CONTRACT_DEPLOY_ADDRESS,
    NATIVE_TOKEN_IDENTIFIER,
};
pub use factory::{FactoryConfig, TransactionFactory};
pub use memento::{ContractRecord, Memento};
pub use nonce::NonceTracker;
pub use ports::AccountSource;
