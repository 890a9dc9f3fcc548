//! Adapter service - owns the configuration and upstream client, binds the
//! listener and serves the router until shut down.

use crate::adapters::ReqwestProxyClient;
use crate::domain::{AdapterConfig, ServiceError};
use crate::ports::ProxyApi;
use crate::router::{build_router, AppState};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Proxy-to-observer adapter service
pub struct AdapterService {
    config: Arc<AdapterConfig>,
    proxy: Arc<dyn ProxyApi>,
}

impl AdapterService {
    /// Validate the configuration and create the upstream client.
    pub fn new(config: AdapterConfig) -> Result<Self, ServiceError> {
        let config = config.validate()?;
        let proxy = Arc::new(ReqwestProxyClient::new(&config)?);
        Ok(Self::with_proxy(config, proxy))
    }

    /// Use a caller-supplied proxy implementation.
    pub fn with_proxy(config: AdapterConfig, proxy: Arc<dyn ProxyApi>) -> Self {
        Self {
            config: Arc::new(config),
            proxy,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Router serving the observer-node routes.
    pub fn router(&self) -> Router {
        build_router(AppState::new(
            Arc::clone(&self.config),
            Arc::clone(&self.proxy),
        ))
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServiceError> {
        TcpListener::bind(self.config.listen)
            .await
            .map_err(|e| ServiceError::Bind(format!("{}: {e}", self.config.listen)))
    }

    /// Serve on `listener` until `signal` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, signal: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: Option<SocketAddr> = listener.local_addr().ok();
        info!(
            addr = ?addr,
            proxy = %self.config.proxy_url,
            shard = self.config.shard,
            "Starting proxy-to-observer adapter"
        );

        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                signal.await;
                info!("Received shutdown signal");
            })
            .await?;

        info!("Adapter stopped");
        Ok(())
    }

    /// Bind the configured address and serve until `signal` resolves.
    pub async fn start<F>(&self, signal: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, signal).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;

    #[test]
    fn test_new_validates_config() {
        let err = AdapterService::new(AdapterConfig::new("", 0)).err().unwrap();
        assert!(matches!(err, ServiceError::Config(ConfigError::MissingProxyUrl)));
    }

    #[test]
    fn test_new_normalizes_proxy_url() {
        let service = AdapterService::new(AdapterConfig::new("http://proxy.test/", 1)).unwrap();
        assert_eq!(service.config().proxy_url, "http://proxy.test");
        assert_eq!(service.config().shard, 1);
    }

    #[tokio::test]
    async fn test_serve_stops_on_signal() {
        let config = AdapterConfig::new("http://127.0.0.1:1", 0)
            .with_listen("127.0.0.1:0".parse().unwrap());
        let service = AdapterService::new(config).unwrap();
        let listener = service.bind().await.unwrap();

        let result = service.serve(listener, async {}).await;
        assert!(result.is_ok());
    }
}
