//! Outbound ports for the adapter.

use crate::domain::{AdapterResult, ProxyPath};
use async_trait::async_trait;
use bytes::Bytes;

/// Query parameters forwarded verbatim, in caller order, duplicates included.
pub type QueryPairs = [(String, String)];

/// Raw reply of a relayed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyReply {
    /// Upstream HTTP status
    pub status: u16,
    /// Upstream body, already checked to be JSON
    pub body: Bytes,
}

/// The network proxy, as seen by the route handlers.
#[async_trait]
pub trait ProxyApi: Send + Sync {
    /// Absolute URL of a proxy path, for logs and error messages.
    fn describe(&self, path: &ProxyPath) -> String;

    /// GET a JSON document. Non-2xx statuses and non-JSON bodies are errors.
    async fn get_json(&self, path: &ProxyPath, query: &QueryPairs) -> AdapterResult<Bytes>;

    /// POST a JSON document and hand back whatever status the proxy chose.
    async fn post_json(&self, path: &ProxyPath, body: &serde_json::Value)
        -> AdapterResult<ProxyReply>;
}
