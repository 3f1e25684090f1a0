//! Tickergate - Market-Data Aggregation Gateway

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tickergate::adapters::cache::{FileCache, TtlCache};
use tickergate::adapters::cli::{CliApp, Command, FetchCmd, ServeCmd, SubmitCmd};
use tickergate::adapters::indexnow::IndexNowSubmitter;
use tickergate::adapters::providers::registry;
use tickergate::adapters::rest::{self, AppState};
use tickergate::adapters::transport::ReqwestTransport;
use tickergate::application::gateway::MarketGateway;
use tickergate::config::{load_config, Config};
use tickergate::domain::capability::{Capability, RouteArgs};
use tickergate::ports::cache::CacheStore;
use tickergate::ports::transport::Transport;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (keys go here, not in gateway.toml)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Serve(cmd) => serve_command(cmd).await,
        Command::Fetch(cmd) => fetch_command(cmd).await,
        Command::Submit(cmd) => submit_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Wire the router from configuration: routes, caches, keys. The
/// development cache is only attached outside production.
fn build_gateway(config: &Config, transport: Arc<dyn Transport>) -> MarketGateway {
    let env = config.runtime.resolved_environment();
    let routes = registry::build_routes(config);
    let rate_cache: Arc<dyn CacheStore> =
        Arc::new(TtlCache::with_capacity(config.cache.max_entries));

    let mut gateway = MarketGateway::new(env, routes, transport, rate_cache);
    if config.dev_cache.enabled {
        let store: Arc<dyn CacheStore> = Arc::new(FileCache::new(&config.dev_cache.path));
        gateway = gateway.with_dev_cache(
            store,
            Duration::from_secs(config.dev_cache.ttl_hours * 3600),
        );
    }
    for (provider, key) in registry::api_keys(config) {
        gateway = gateway.with_api_key(&provider, key);
    }
    gateway
}

async fn serve_command(cmd: ServeCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let env = config.runtime.resolved_environment();
    tracing::info!("starting gateway ({env:?} runtime)");

    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new()?);
    let gateway = build_gateway(&config, transport.clone());
    let submitter = config
        .indexnow
        .as_ref()
        .map(|section| IndexNowSubmitter::new(transport.clone(), section));

    let port = cmd.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .context("invalid listen address")?;

    let state = Arc::new(AppState { gateway, submitter });
    rest::serve(addr, state).await?;
    tracing::info!("gateway stopped");
    Ok(())
}

async fn fetch_command(cmd: FetchCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let Some(capability) = Capability::parse(&cmd.capability) else {
        bail!(
            "unknown capability '{}'; expected one of: {}",
            cmd.capability,
            Capability::ALL.map(|c| c.path_tag()).join(", ")
        );
    };

    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new()?);
    let gateway = build_gateway(&config, transport);

    let args = RouteArgs {
        coin_id: cmd.coin,
        symbol: cmd.symbol,
        chain: cmd.chain,
        pair_address: cmd.pair,
        vs_currency: cmd.vs_currency,
        page: cmd.page,
        depth: cmd.depth,
        ..Default::default()
    };

    let result = gateway.route(capability, &args).await?;
    if result.degraded {
        tracing::warn!("every provider failed; printing static fallback data");
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn submit_command(cmd: SubmitCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let Some(section) = config.indexnow.as_ref() else {
        bail!("no [indexnow] section in the configuration");
    };

    let mut urls = cmd.urls.clone();
    if let Some(ref path) = cmd.from_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read URL list {}", path.display()))?;
        urls.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
    }
    if urls.is_empty() {
        bail!("no URLs to submit");
    }

    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new()?);
    let submitter = IndexNowSubmitter::new(transport, section);
    let report = submitter.submit_all(&urls).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.failures.is_empty() {
        bail!(
            "{} of {} batches failed",
            report.failures.len(),
            report.batches
        );
    }
    Ok(())
}
