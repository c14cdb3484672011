use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Candlestick intervals analysed by the scanner, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrame {
    #[serde(rename = "15m")]
    Min15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
}

impl TimeFrame {
    /// All timeframes in the fixed analysis order
    pub fn all() -> &'static [TimeFrame] {
        &[
            TimeFrame::Min15,
            TimeFrame::Hour1,
            TimeFrame::Hour4,
            TimeFrame::Day1,
        ]
    }

    /// Interval string understood by the Binance klines endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Min15 => "15m",
            TimeFrame::Hour1 => "1h",
            TimeFrame::Hour4 => "4h",
            TimeFrame::Day1 => "1d",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcBar {
    pub fn new(open_time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
        }
    }

    /// Prices must be finite and non-negative to enter a history
    pub fn is_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p >= 0.0)
    }
}

/// Chronological (oldest first) bars for one symbol on one timeframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub bars: Vec<OhlcBar>,
}

impl PriceHistory {
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame, bars: Vec<OhlcBar>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Drop the oldest bars so that at most `limit` remain
    pub fn truncate_to_latest(&mut self, limit: usize) {
        if self.bars.len() > limit {
            let excess = self.bars.len() - limit;
            self.bars.drain(0..excess);
        }
    }
}

/// Anything able to supply recent price history for a symbol.
///
/// Implementations absorb their own transport failures and retries; `None`
/// means the data is unavailable for this timeframe and the caller moves on.
#[async_trait]
pub trait PriceHistorySource {
    async fn fetch_history(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        limit: usize,
    ) -> Option<PriceHistory>;
}

/// Turn user input such as " eth " into an exchange pair like "ETHUSDT".
pub fn normalize_symbol(input: &str, quote_currency: &str) -> Result<String> {
    let base = input.trim();
    if base.is_empty() {
        return Err(anyhow!("Cryptocurrency name must not be empty"));
    }
    Ok(format!(
        "{}{}",
        base.to_uppercase(),
        quote_currency.to_uppercase()
    ))
}
