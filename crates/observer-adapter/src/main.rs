//! Proxy-to-observer adapter binary.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use observer_adapter::domain::config::{parse_duration, DEFAULT_LISTEN, DEFAULT_MAX_BODY_SIZE};
use observer_adapter::{init_logging, AdapterConfig, AdapterService, LogFormat, LoggingConfig};

/// Serve observer-node routes backed by a network proxy
#[derive(Parser, Debug)]
#[command(name = "proxy-to-observer-adapter")]
#[command(version, about = "Translate observer-node API calls into network proxy calls")]
struct Args {
    /// Base URL of the network proxy
    #[arg(long, env = "ADAPTER_PROXY_URL")]
    proxy: String,

    /// Shard this adapter represents (4294967295 for the metachain)
    #[arg(long, env = "ADAPTER_SHARD")]
    shard: u32,

    /// Address to listen on
    #[arg(long, env = "ADAPTER_LISTEN", default_value_t = DEFAULT_LISTEN)]
    listen: SocketAddr,

    /// Upstream request timeout (e.g. "30s", "500ms"); none by default
    #[arg(long, env = "ADAPTER_TIMEOUT", value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Milliseconds to wait before relaying each GET
    #[arg(long, env = "ADAPTER_DELAY_MS", default_value_t = 0)]
    sleep: u64,

    /// Largest accepted request body in bytes
    #[arg(long, env = "ADAPTER_MAX_BODY_SIZE", default_value_t = DEFAULT_MAX_BODY_SIZE)]
    max_body_size: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format: pretty or json
    #[arg(long, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&LoggingConfig {
        level: args.log_level.clone(),
        format: args.log_format,
    })
    .context("initializing logging")?;

    let config = AdapterConfig::new(args.proxy, args.shard)
        .with_listen(args.listen)
        .with_request_timeout(args.timeout)
        .with_get_delay(Duration::from_millis(args.sleep))
        .with_max_body_size(args.max_body_size);

    let service = AdapterService::new(config).context("creating adapter")?;
    if service.config().request_timeout.is_none() {
        info!("No upstream timeout configured; a stalled proxy stalls the request");
    }

    service
        .start(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("serving adapter")?;

    Ok(())
}
