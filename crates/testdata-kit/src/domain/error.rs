//! Error type shared by the kit.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum KitError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("proxy request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("proxy {url} returned HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("unexpected proxy response from {url}: {reason}")]
    UnexpectedResponse { url: String, reason: String },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("no nonce tracked for {0}")]
    UnknownNonce(String),
}

pub type KitResult<T> = Result<T, KitError>;
