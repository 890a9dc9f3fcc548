//! Adapters implementing the outbound ports.

pub mod proxy_client;

pub use proxy_client::ReqwestProxyClient;
