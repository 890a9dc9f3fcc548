//! Adapters implementing the kit's ports.

pub mod proxy_accounts;

pub use proxy_accounts::ProxyAccountSource;
