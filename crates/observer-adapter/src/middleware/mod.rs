//! Middleware stack for the adapter.
//!
//! Layer order: Request → RequestTracing → BodyLimit → Handler

pub mod request_trace;

pub use request_trace::{RequestTracingLayer, REQUEST_ID_HEADER};
