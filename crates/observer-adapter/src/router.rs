//! Observer-node routes and their translation to proxy calls.
//!
//! | Route                               | Proxy call                                   |
//! |-------------------------------------|----------------------------------------------|
//! | `GET /node/status`                  | `GET network/status/{shard}` (reshaped)      |
//! | `GET /node/epoch-start/{epoch}`     | `GET network/epoch-start/{shard}/by-epoch/{epoch}` |
//! | `GET /block/by-nonce/{nonce}`       | `GET block/{shard}/by-nonce/{nonce}`         |
//! | `GET /address/{address}/esdt/{token}` | `GET address/{address}/esdt/{token}`       |
//! | `GET /address/{address}`            | `GET address/{address}`                      |
//! | `POST /transaction/send`            | `POST transaction/send` (status relayed)     |

use crate::domain::{AdapterConfig, AdapterResult, NodeStatusEnvelope, ProxyPath, ProxyStatusEnvelope};
use crate::middleware::RequestTracingLayer;
use crate::ports::ProxyApi;
use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AdapterConfig>,
    pub proxy: Arc<dyn ProxyApi>,
}

impl AppState {
    pub fn new(config: Arc<AdapterConfig>, proxy: Arc<dyn ProxyApi>) -> Self {
        Self { config, proxy }
    }

    /// Delay a GET relay by the configured amount.
    async fn throttle(&self) {
        if !self.config.get_delay.is_zero() {
            tokio::time::sleep(self.config.get_delay).await;
        }
    }

    async fn relay_get(&self, path: ProxyPath, query: &[(String, String)]) -> AdapterResult<RawJson> {
        self.throttle().await;
        let body = self.proxy.get_json(&path, query).await?;
        Ok(RawJson::ok(body))
    }
}

/// A JSON body relayed byte for byte.
#[derive(Debug)]
pub struct RawJson {
    status: StatusCode,
    body: Bytes,
}

impl RawJson {
    fn ok(body: Bytes) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }
}

impl IntoResponse for RawJson {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// Build the adapter router with its middleware stack.
pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(RequestTracingLayer::new())
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    Router::new()
        .route("/node/status", get(node_status))
        .route("/node/epoch-start/:epoch", get(epoch_start))
        .route("/block/by-nonce/:nonce", get(block_by_nonce))
        .route("/address/:address/esdt/:token", get(account_esdt))
        .route("/address/:address", get(account))
        .route("/transaction/send", post(send_transaction))
        .route("/health", get(health))
        .layer(middleware)
        .with_state(state)
}

async fn node_status(State(state): State<AppState>) -> AdapterResult<Json<NodeStatusEnvelope>> {
    let path = ProxyPath::network_status(state.config.shard);
    let url = state.proxy.describe(&path);

    state.throttle().await;
    let body = state.proxy.get_json(&path, &[]).await?;
    let proxy_status = ProxyStatusEnvelope::from_slice(&url, &body)?;

    Ok(Json(NodeStatusEnvelope::from(proxy_status)))
}

async fn epoch_start(
    State(state): State<AppState>,
    Path(epoch): Path<u32>,
) -> AdapterResult<RawJson> {
    let path = ProxyPath::epoch_start(state.config.shard, epoch);
    state.relay_get(path, &[]).await
}

async fn block_by_nonce(
    State(state): State<AppState>,
    Path(nonce): Path<u64>,
    Query(query): Query<Vec<(String, String)>>,
) -> AdapterResult<RawJson> {
    let path = ProxyPath::block_by_nonce(state.config.shard, nonce);
    state.relay_get(path, &query).await
}

async fn account_esdt(
    State(state): State<AppState>,
    Path((address, token)): Path<(String, String)>,
    Query(query): Query<Vec<(String, String)>>,
) -> AdapterResult<RawJson> {
    state
        .relay_get(ProxyPath::account_esdt(&address, &token), &query)
        .await
}

async fn account(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> AdapterResult<RawJson> {
    state.relay_get(ProxyPath::account(&address), &query).await
}

/// Relay a transaction; the proxy's status is the caller's status.
async fn send_transaction(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AdapterResult<RawJson> {
    let reply = state
        .proxy
        .post_json(&ProxyPath::send_transaction(), &body)
        .await?;

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok(RawJson {
        status,
        body: reply.body,
    })
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "proxy": state.config.proxy_url,
        "shard": state.config.shard,
    }))
}
