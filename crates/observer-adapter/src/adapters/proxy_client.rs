//! `reqwest`-backed implementation of [`ProxyApi`].

use crate::domain::{AdapterConfig, AdapterError, AdapterResult, ProxyPath, ServiceError};
use crate::ports::{ProxyApi, ProxyReply, QueryPairs};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};
use serde::de::IgnoredAny;
use tracing::{debug, info};

/// HTTP client for the network proxy.
pub struct ReqwestProxyClient {
    client: Client,
    base_url: Url,
}

impl ReqwestProxyClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &AdapterConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        let base_url = Url::parse(&config.proxy_url)
            .map_err(|e| ServiceError::Client(format!("{}: {e}", config.proxy_url)))?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, path: &ProxyPath) -> AdapterResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AdapterError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path.segments());
        Ok(url)
    }
}

fn transport_error(url: &Url, e: reqwest::Error) -> AdapterError {
    if e.is_timeout() {
        AdapterError::Timeout {
            url: url.to_string(),
        }
    } else {
        AdapterError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

fn ensure_json(url: &Url, body: &[u8]) -> AdapterResult<()> {
    serde_json::from_slice::<IgnoredAny>(body)
        .map(|_| ())
        .map_err(|e| AdapterError::MalformedJson {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl ProxyApi for ReqwestProxyClient {
    fn describe(&self, path: &ProxyPath) -> String {
        self.url_for(path)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("{}/{}", self.base_url, path))
    }

    async fn get_json(&self, path: &ProxyPath, query: &QueryPairs) -> AdapterResult<Bytes> {
        let url = self.url_for(path)?;
        info!(url = %url, params = query.len(), "GET proxy");

        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;
        ensure_json(&url, &body)?;

        debug!(url = %url, bytes = body.len(), "Proxy answered");
        Ok(body)
    }

    async fn post_json(
        &self,
        path: &ProxyPath,
        body: &serde_json::Value,
    ) -> AdapterResult<ProxyReply> {
        let url = self.url_for(path)?;
        info!(url = %url, "POST proxy");

        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;
        ensure_json(&url, &body)?;

        debug!(url = %url, status, "Proxy answered");
        Ok(ProxyReply { status, body })
    }
}
