//! CLI definitions
//!
//! Argument structures for the gateway binary. Command handlers live in
//! `main.rs`; keeping the clap types here keeps them parse-testable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tickergate - Market-Data Aggregation Gateway
#[derive(Parser, Debug)]
#[command(
    name = "tickergate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Market-data aggregation gateway",
    long_about = "Tickergate fronts multiple cryptocurrency market-data providers with \
                  ordered failover, credential-placement fallback, rate-limit caching \
                  and static degradation."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP gateway
    Serve(ServeCmd),

    /// Fetch one capability and print the result as JSON
    Fetch(FetchCmd),

    /// Submit URLs to the search-index push endpoint
    Submit(SubmitCmd),
}

/// Run the HTTP gateway
#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/gateway.toml")]
    pub config: PathBuf,

    /// Override the configured listen port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,
}

/// One-shot capability fetch, for smoke-testing a configuration
#[derive(Parser, Debug)]
pub struct FetchCmd {
    /// Capability tag, e.g. trending-coins, global-market, order-book
    #[arg(value_name = "CAPABILITY")]
    pub capability: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/gateway.toml")]
    pub config: PathBuf,

    /// Coin id for coin-detail, e.g. bitcoin
    #[arg(long, value_name = "ID")]
    pub coin: Option<String>,

    /// Trading symbol for order-book, e.g. BTCUSDT
    #[arg(long, value_name = "SYMBOL")]
    pub symbol: Option<String>,

    /// Chain for dex-pair, e.g. solana
    #[arg(long, value_name = "CHAIN")]
    pub chain: Option<String>,

    /// Pair/pool address for dex-pair
    #[arg(long, value_name = "ADDRESS")]
    pub pair: Option<String>,

    /// Quote currency for listings (default: usd)
    #[arg(long, value_name = "CURRENCY")]
    pub vs_currency: Option<String>,

    /// Listing page
    #[arg(long, value_name = "PAGE")]
    pub page: Option<u32>,

    /// Order book depth
    #[arg(long, value_name = "LEVELS")]
    pub depth: Option<u32>,
}

/// Submit URLs to the search-index push endpoint
#[derive(Parser, Debug)]
pub struct SubmitCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/gateway.toml")]
    pub config: PathBuf,

    /// URLs to submit
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Read additional URLs from a file, one per line
    #[arg(long, value_name = "FILE")]
    pub from_file: Option<PathBuf>,
}
