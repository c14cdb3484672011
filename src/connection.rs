use crate::config::BinanceConfig;
use crate::market_data::{OhlcBar, PriceHistory, PriceHistorySource, TimeFrame};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::DateTime;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde_json::Value;
use tokio::time::sleep;

const KLINES_ENDPOINT: &str = "/api/v3/klines";

/// Public market-data client for the Binance spot REST API.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    http: Client,
    config: BinanceConfig,
}

impl BinanceClient {
    pub fn new(config: BinanceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("cryptosignals/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        info!(
            "Binance client ready: {} ({} attempts, {}s between retries)",
            config.base_url, config.max_retries, config.retry_delay_secs
        );

        Ok(Self { http, config })
    }

    /// Request raw klines, retrying non-success responses and transport
    /// errors with a fixed delay. Returns `None` once attempts run out or the
    /// body is not JSON.
    async fn request_klines(&self, symbol: &str, timeframe: TimeFrame, limit: usize) -> Option<Value> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), KLINES_ENDPOINT);
        let attempts = self.config.max_retries.max(1);
        let params = [
            ("symbol", symbol.to_string()),
            ("interval", timeframe.as_str().to_string()),
            ("limit", limit.to_string()),
        ];

        for attempt in 1..=attempts {
            match self.http.get(&url).query(&params).send().await {
                Ok(response) if response.status().is_success() => {
                    return match response.json::<Value>().await {
                        Ok(payload) => Some(payload),
                        Err(e) => {
                            error!(
                                "Error decoding JSON response for {} from Binance API: {}",
                                symbol, e
                            );
                            None
                        }
                    };
                }
                Ok(response) => {
                    error!(
                        "Error fetching data for {} (Attempt {}/{}): {}",
                        symbol,
                        attempt,
                        attempts,
                        response.status()
                    );
                }
                Err(e) => {
                    error!(
                        "Error fetching data for {} (Attempt {}/{}): {}",
                        symbol, attempt, attempts, e
                    );
                }
            }

            if attempt < attempts {
                sleep(self.config.retry_delay()).await;
            }
        }

        None
    }
}

#[async_trait]
impl PriceHistorySource for BinanceClient {
    async fn fetch_history(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        limit: usize,
    ) -> Option<PriceHistory> {
        let payload = self.request_klines(symbol, timeframe, limit).await?;

        let bars = match parse_klines(&payload) {
            Ok(bars) => bars,
            Err(e) => {
                error!("Error decoding klines for {} on {}: {:#}", symbol, timeframe, e);
                return None;
            }
        };

        if bars.is_empty() {
            warn!("No data received for {} on {} timeframe.", symbol, timeframe);
            return None;
        }

        let mut history = PriceHistory::new(symbol, timeframe, bars);
        history.truncate_to_latest(limit);
        debug!("Loaded {} {} bars for {}", history.len(), timeframe, symbol);

        Some(history)
    }
}

/// Parse a klines payload: an array of rows whose first five elements are
/// open time (ms), open, high, low and close.
pub fn parse_klines(payload: &Value) -> Result<Vec<OhlcBar>> {
    let rows = payload
        .as_array()
        .ok_or_else(|| anyhow!("Expected a JSON array of klines"))?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_kline_row(row).with_context(|| format!("Malformed kline at index {}", i)))
        .collect()
}

fn parse_kline_row(row: &Value) -> Result<OhlcBar> {
    let fields = row
        .as_array()
        .filter(|fields| fields.len() >= 5)
        .ok_or_else(|| anyhow!("Expected at least 5 fields"))?;

    let open_time_ms = fields[0]
        .as_i64()
        .ok_or_else(|| anyhow!("Open time is not an integer"))?;
    let open_time = DateTime::from_timestamp_millis(open_time_ms)
        .ok_or_else(|| anyhow!("Open time {} out of range", open_time_ms))?;

    let bar = OhlcBar::new(
        open_time,
        parse_price(&fields[1])?,
        parse_price(&fields[2])?,
        parse_price(&fields[3])?,
        parse_price(&fields[4])?,
    );

    if !bar.is_valid() {
        return Err(anyhow!("Prices must be finite and non-negative"));
    }
    Ok(bar)
}

/// Binance sends prices as decimal strings; plain numbers are accepted too.
fn parse_price(value: &Value) -> Result<f64> {
    match value {
        Value::String(s) => s
            .parse::<f64>()
            .with_context(|| format!("Invalid price {:?}", s)),
        Value::Number(n) => n.as_f64().ok_or_else(|| anyhow!("Invalid price {}", n)),
        other => Err(anyhow!("Unexpected price value {}", other)),
    }
}
