//! Domain types for the adapter: configuration, errors, upstream paths and
//! the `/node/status` reshape.

pub mod config;
pub mod error;
pub mod types;

pub use config::{parse_duration, AdapterConfig, ConfigError, DEFAULT_MAX_BODY_SIZE};
pub use error::{AdapterError, AdapterResult, ServiceError};
pub use types::*;
