use cryptosignals::config::AppConfig;
use cryptosignals::connection::BinanceClient;
use cryptosignals::market_data::normalize_symbol;
use cryptosignals::report::{render_json, render_text};
use cryptosignals::timeframe_selector::TimeframeSelector;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;

/// Find the candlestick timeframe with the strongest RSI / StochRSI / ATR signal
#[derive(Parser, Debug)]
#[command(name = "cryptosignals", version)]
struct Cli {
    /// Cryptocurrency name, e.g. BTC, ETH, ONE (prompted for when omitted)
    symbol: Option<String>,

    /// JSON configuration file; built-in defaults are used if it does not exist
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Also list every analysed timeframe with its indicator values
    #[arg(long)]
    all: bool,

    /// Print the full report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn prompt_symbol() -> Result<String> {
    print!("Enter the cryptocurrency name (e.g., BTC, ETH, ONE): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read cryptocurrency name")?;
    Ok(input)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("Command line: {:?}", cli);

    info!("Loading configuration from: {}", cli.config.display());
    let config = AppConfig::load_from_file(&cli.config)?;

    let input = match cli.symbol {
        Some(symbol) => symbol,
        None => prompt_symbol()?,
    };
    let symbol = normalize_symbol(&input, &config.analysis.quote_currency)?;

    if !cli.json {
        println!("Analyzing {} across multiple timeframes...", symbol);
    }

    let client = BinanceClient::new(config.binance.clone())?;
    let selector = TimeframeSelector::from_config(client, &config);
    let report = selector.analyze(&symbol).await;

    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        println!();
        print!("{}", render_text(&report, cli.all));
    }

    Ok(())
}
