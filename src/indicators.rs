//! Momentum and volatility indicators over candlestick history.
//!
//! Every calculation reports the value as of the newest bar. Missing values
//! (`None`) mean the history is too short or the arithmetic is undefined;
//! neither is treated as an error.

use crate::config::IndicatorConfig;
use crate::market_data::{OhlcBar, PriceHistory};
use crate::stats::{expanding_rolling_mean, finite, rolling_max, rolling_mean, rolling_min, round_to};
use serde::{Deserialize, Serialize};

const STOCH_RSI_DECIMALS: i32 = 2;
const ATR_DECIMALS: i32 = 5;

/// Indicator values for the newest bar of one history
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,         // 0-100, unrounded
    pub stoch_rsi_k: Option<f64>, // 0-1, 2 decimals
    pub stoch_rsi_d: Option<f64>, // 0-1, 2 decimals
    pub atr: Option<f64>,         // >= 0, 5 decimals
}

impl IndicatorSnapshot {
    /// True when RSI, StochRSI %K/%D and ATR are all present
    pub fn is_complete(&self) -> bool {
        self.rsi.is_some()
            && self.stoch_rsi_k.is_some()
            && self.stoch_rsi_d.is_some()
            && self.atr.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorCalculator {
    pub rsi_period: usize,     // RSI and StochRSI lookback (default 14)
    pub stoch_smooth_k: usize, // %K smoothing window (default 3)
    pub stoch_smooth_d: usize, // %D smoothing window (default 3)
    pub atr_period: usize,     // ATR lookback (default 14)
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&IndicatorConfig> for IndicatorCalculator {
    fn from(config: &IndicatorConfig) -> Self {
        Self::with_settings(
            config.rsi_period,
            config.stoch_smooth_k,
            config.stoch_smooth_d,
            config.atr_period,
        )
    }
}

impl IndicatorCalculator {
    pub fn new() -> Self {
        Self {
            rsi_period: 14,
            stoch_smooth_k: 3,
            stoch_smooth_d: 3,
            atr_period: 14,
        }
    }

    pub fn with_settings(
        rsi_period: usize,
        stoch_smooth_k: usize,
        stoch_smooth_d: usize,
        atr_period: usize,
    ) -> Self {
        Self {
            rsi_period,
            stoch_smooth_k,
            stoch_smooth_d,
            atr_period,
        }
    }

    /// Compute every indicator for the newest bar of `history`
    pub fn calculate_snapshot(&self, history: &PriceHistory) -> IndicatorSnapshot {
        let closes = history.closes();
        let (stoch_rsi_k, stoch_rsi_d) = self.calculate_stoch_rsi(&closes);

        IndicatorSnapshot {
            rsi: self.calculate_rsi(&closes),
            stoch_rsi_k,
            stoch_rsi_d,
            atr: self.calculate_atr(&history.bars),
        }
    }

    /// Relative Strength Index of the newest close.
    ///
    /// Gains and losses are averaged with a window that expands from a single
    /// point up to `rsi_period`. A zero average loss saturates RSI to 100.
    pub fn calculate_rsi(&self, closes: &[f64]) -> Option<f64> {
        if closes.is_empty() || closes.len() < self.rsi_period {
            return None;
        }
        self.rsi_series(closes).last().copied().and_then(finite)
    }

    /// RSI as of every position in `closes`.
    ///
    /// Position `i` equals the RSI of the prefix `closes[..=i]`; prefixes
    /// shorter than `rsi_period` are `NaN`.
    pub fn rsi_series(&self, closes: &[f64]) -> Vec<f64> {
        let mut gains = Vec::with_capacity(closes.len());
        let mut losses = Vec::with_capacity(closes.len());

        // The first close has no predecessor and contributes a zero move
        if !closes.is_empty() {
            gains.push(0.0);
            losses.push(0.0);
        }
        for pair in closes.windows(2) {
            let delta = pair[1] - pair[0];
            gains.push(if delta > 0.0 { delta } else { 0.0 });
            losses.push(if delta < 0.0 { -delta } else { 0.0 });
        }

        let avg_gains = expanding_rolling_mean(&gains, self.rsi_period);
        let avg_losses = expanding_rolling_mean(&losses, self.rsi_period);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .enumerate()
            .map(|(i, (&avg_gain, &avg_loss))| {
                if i + 1 < self.rsi_period {
                    f64::NAN
                } else {
                    rsi_from_averages(avg_gain, avg_loss)
                }
            })
            .collect()
    }

    /// Stochastic RSI `(%K, %D)` of the newest close, rounded to 2 decimals.
    pub fn calculate_stoch_rsi(&self, closes: &[f64]) -> (Option<f64>, Option<f64>) {
        if closes.is_empty() || closes.len() < self.rsi_period {
            return (None, None);
        }

        let rsi = self.rsi_series(closes);
        let lowest = rolling_min(&rsi, self.rsi_period);
        let highest = rolling_max(&rsi, self.rsi_period);

        // A flat window divides 0 by 0 and stays NaN
        let stoch_rsi: Vec<f64> = rsi
            .iter()
            .zip(lowest.iter().zip(highest.iter()))
            .map(|(&value, (&low, &high))| (value - low) / (high - low))
            .collect();

        let k = rolling_mean(&stoch_rsi, self.stoch_smooth_k);
        let d = rolling_mean(&k, self.stoch_smooth_d);

        let report = |series: &[f64]| {
            series
                .last()
                .copied()
                .and_then(finite)
                .map(|v| round_to(v, STOCH_RSI_DECIMALS))
        };

        (report(&k), report(&d))
    }

    /// Average True Range of the newest bar, rounded to 5 decimals.
    ///
    /// Unlike RSI the averaging window does not expand: fewer than
    /// `atr_period` true ranges leave the value undefined.
    pub fn calculate_atr(&self, bars: &[OhlcBar]) -> Option<f64> {
        if bars.is_empty() || bars.len() < self.atr_period {
            return None;
        }

        let ranges = true_ranges(bars);
        rolling_mean(&ranges, self.atr_period)
            .last()
            .copied()
            .and_then(finite)
            .map(|v| round_to(v, ATR_DECIMALS))
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// True range per bar; the first bar has no previous close so only its
/// high-low span counts.
pub fn true_ranges(bars: &[OhlcBar]) -> Vec<f64> {
    let mut ranges = Vec::with_capacity(bars.len());
    let mut prev_close: Option<f64> = None;

    for bar in bars {
        let high_low = bar.high - bar.low;
        let range = match prev_close {
            Some(close) => high_low
                .max((bar.high - close).abs())
                .max((bar.low - close).abs()),
            None => high_low,
        };
        ranges.push(range);
        prev_close = Some(bar.close);
    }

    ranges
}
