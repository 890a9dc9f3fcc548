//! Upstream paths and the typed `/node/status` reshape.

use crate::domain::error::AdapterError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// App version reported to the checker in place of a real node's.
pub const APP_VERSION_PLACEHOLDER: &str = "v1.2.3";

/// Block-signing public key reported to the checker in place of a real node's.
pub const BLOCK_SIGN_KEY_PLACEHOLDER: &str = "abba";

/// Metric key carrying the app version
pub const METRIC_APP_VERSION: &str = "erd_app_version";

/// Metric key carrying the block-signing public key
pub const METRIC_PUBLIC_KEY_BLOCK_SIGN: &str = "erd_public_key_block_sign";

/// Path of a proxy resource, kept as raw segments so that each one is
/// percent-encoded on its own when appended to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyPath {
    segments: Vec<String>,
}

impl ProxyPath {
    fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// `network/status/{shard}`
    pub fn network_status(shard: u32) -> Self {
        Self::from_segments(["network".to_string(), "status".into(), shard.to_string()])
    }

    /// `network/epoch-start/{shard}/by-epoch/{epoch}`
    pub fn epoch_start(shard: u32, epoch: u32) -> Self {
        Self::from_segments([
            "network".to_string(),
            "epoch-start".into(),
            shard.to_string(),
            "by-epoch".into(),
            epoch.to_string(),
        ])
    }

    /// `block/{shard}/by-nonce/{nonce}`
    pub fn block_by_nonce(shard: u32, nonce: u64) -> Self {
        Self::from_segments([
            "block".to_string(),
            shard.to_string(),
            "by-nonce".into(),
            nonce.to_string(),
        ])
    }

    /// `address/{address}`
    pub fn account(address: &str) -> Self {
        Self::from_segments(["address", address])
    }

    /// `address/{address}/esdt/{token}`
    pub fn account_esdt(address: &str, token: &str) -> Self {
        Self::from_segments(["address", address, "esdt", token])
    }

    /// `transaction/send`
    pub fn send_transaction() -> Self {
        Self::from_segments(["transaction", "send"])
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for ProxyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// `GET /network/status/{shard}` as returned by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyStatusEnvelope {
    pub data: ProxyStatusData,
    /// Envelope siblings such as `error` and `code`
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyStatusData {
    pub status: Map<String, Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `GET /node/status` as an observer node would return it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStatusEnvelope {
    pub data: NodeStatusData,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStatusData {
    pub metrics: Map<String, Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ProxyStatusEnvelope {
    /// Parse a proxy status body, separating malformed JSON from a wrong shape.
    pub fn from_slice(url: &str, body: &[u8]) -> Result<Self, AdapterError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| AdapterError::MalformedJson {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        serde_json::from_value(value)
            .map_err(|e| AdapterError::UnexpectedShape(format!("{url}: {e}")))
    }
}

impl From<ProxyStatusEnvelope> for NodeStatusEnvelope {
    /// Rename `data.status` to `data.metrics` and inject the placeholder metrics.
    fn from(proxy: ProxyStatusEnvelope) -> Self {
        let mut metrics = proxy.data.status;
        metrics.insert(
            METRIC_APP_VERSION.to_string(),
            Value::String(APP_VERSION_PLACEHOLDER.to_string()),
        );
        metrics.insert(
            METRIC_PUBLIC_KEY_BLOCK_SIGN.to_string(),
            Value::String(BLOCK_SIGN_KEY_PLACEHOLDER.to_string()),
        );

        // A stale upstream `metrics` would otherwise be flattened next to ours.
        let mut rest = proxy.data.rest;
        rest.remove("metrics");

        Self {
            data: NodeStatusData { metrics, rest },
            rest: proxy.rest,
        }
    }
}
