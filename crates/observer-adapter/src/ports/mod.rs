//! Ports (hexagonal seams) of the adapter.

pub mod outbound;

pub use outbound::{ProxyApi, ProxyReply, QueryPairs};
