//! [`AccountSource`] backed by the proxy's `GET /address/{address}`.

use crate::domain::{KitError, KitResult};
use crate::ports::AccountSource;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct AccountEnvelope {
    data: AccountData,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    account: AccountRecord,
}

#[derive(Debug, Deserialize)]
struct AccountRecord {
    nonce: u64,
}

/// Reads account nonces from a network proxy.
#[derive(Debug, Clone)]
pub struct ProxyAccountSource {
    client: Client,
    base_url: Url,
}

impl ProxyAccountSource {
    pub fn new(proxy_url: &str, timeout: Option<Duration>) -> KitResult<Self> {
        let base_url = Url::parse(proxy_url.trim_end_matches('/'))
            .map_err(|e| KitError::InvalidArgument(format!("proxy url {proxy_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(KitError::InvalidArgument(format!(
                "proxy url {proxy_url} cannot carry a path"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| KitError::Transport {
            url: proxy_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    fn account_url(&self, address: &str) -> KitResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| KitError::InvalidArgument(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["address", address]);
        Ok(url)
    }
}

#[async_trait]
impl AccountSource for ProxyAccountSource {
    async fn account_nonce(&self, address: &str) -> KitResult<u64> {
        let url = self.account_url(address)?;
        debug!(url = %url, "fetching account nonce");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| KitError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(KitError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| KitError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let envelope: AccountEnvelope =
            serde_json::from_slice(&body).map_err(|e| KitError::UnexpectedResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(envelope.data.account.nonce)
    }
}
