//! Proxy-to-observer adapter.
//!
//! Serves the handful of observer-node routes a Rosetta server needs, backed
//! by a network proxy, so a conformance checker can run against a
//! proxy-only network.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     OBSERVER ADAPTER                          │
//! ├───────────────────────────────────────────────────────────────┤
//! │  Rosetta server ──HTTP──▶ Router (observer-node routes)       │
//! │                              │                                │
//! │                  RequestTracing → BodyLimit                   │
//! │                              │                                │
//! │                   AppState { Arc<AdapterConfig>,              │
//! │                              Arc<dyn ProxyApi> }              │
//! │                              │                                │
//! │                   ReqwestProxyClient ──HTTP──▶ Proxy          │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `/node/status` is reshaped (`data.status` becomes `data.metrics`
//! plus two placeholder metrics). Every other GET is relayed byte for byte;
//! `POST /transaction/send` also relays the proxy's status code.
//!
//! # Usage
//!
//! ```ignore
//! use observer_adapter::{AdapterConfig, AdapterService};
//!
//! let service = AdapterService::new(AdapterConfig::new("http://localhost:7950", 0))?;
//! service.start(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod middleware;
pub mod ports;
pub mod router;
pub mod service;
pub mod telemetry;

pub use adapters::ReqwestProxyClient;
pub use domain::config::{AdapterConfig, ConfigError};
pub use domain::error::{AdapterError, AdapterResult, ServiceError};
pub use domain::types::*;
pub use ports::{ProxyApi, ProxyReply};
pub use router::{build_router, AppState};
pub use service::AdapterService;
pub use telemetry::{init_logging, LogFormat, LoggingConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
