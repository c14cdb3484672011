//! Signal vocabulary shared by the classifier, the selector and the report.
//!
//! Each label renders to fixed text. Downstream rules (hold time, scoring)
//! match on substrings of that text, so the wording is part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiSignal {
    #[serde(rename = "Overbought - Strong Sell")]
    OverboughtStrongSell,
    #[serde(rename = "Oversold - Strong Buy")]
    OversoldStrongBuy,
    #[serde(rename = "Neutral")]
    Neutral,
}

impl RsiSignal {
    pub fn label(&self) -> &'static str {
        match self {
            RsiSignal::OverboughtStrongSell => "Overbought - Strong Sell",
            RsiSignal::OversoldStrongBuy => "Oversold - Strong Buy",
            RsiSignal::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StochRsiSignal {
    #[serde(rename = "Strong Sell")]
    StrongSell,
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    #[serde(rename = "Buy")]
    Buy,
    #[serde(rename = "Sell")]
    Sell,
}

impl StochRsiSignal {
    pub fn label(&self) -> &'static str {
        match self {
            StochRsiSignal::StrongSell => "Strong Sell",
            StochRsiSignal::StrongBuy => "Strong Buy",
            StochRsiSignal::Buy => "Buy",
            StochRsiSignal::Sell => "Sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilitySignal {
    #[serde(rename = "Sideways (Low volatility)")]
    Sideways,
    #[serde(rename = "High Volatility")]
    HighVolatility,
    #[serde(rename = "Stable Market")]
    StableMarket,
}

impl VolatilitySignal {
    pub fn label(&self) -> &'static str {
        match self {
            VolatilitySignal::Sideways => "Sideways (Low volatility)",
            VolatilitySignal::HighVolatility => "High Volatility",
            VolatilitySignal::StableMarket => "Stable Market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldTime {
    #[serde(rename = "Hold for 1-3 days")]
    HoldOneToThreeDays,
    #[serde(rename = "Exit within hours")]
    ExitWithinHours,
    #[serde(rename = "Wait for a clear signal")]
    WaitForClearSignal,
}

impl HoldTime {
    pub fn label(&self) -> &'static str {
        match self {
            HoldTime::HoldOneToThreeDays => "Hold for 1-3 days",
            HoldTime::ExitWithinHours => "Exit within hours",
            HoldTime::WaitForClearSignal => "Wait for a clear signal",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(RsiSignal, StochRsiSignal, VolatilitySignal, HoldTime);

/// Signals derived from one timeframe's indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub rsi_signal: RsiSignal,
    pub stoch_rsi_signal: StochRsiSignal,
    pub volatility_signal: VolatilitySignal,
    pub hold_time: HoldTime,
}

impl SignalSet {
    /// Whether the RSI or the StochRSI label contains `needle`
    pub fn either_contains(&self, needle: &str) -> bool {
        self.rsi_signal.label().contains(needle) || self.stoch_rsi_signal.label().contains(needle)
    }

    /// `(name, label)` pairs in report order
    pub fn entries(&self) -> [(&'static str, &'static str); 4] {
        [
            ("RSI Signal", self.rsi_signal.label()),
            ("StochRSI Signal", self.stoch_rsi_signal.label()),
            ("ATR Signal", self.volatility_signal.label()),
            ("Estimated Time to Hold", self.hold_time.label()),
        ]
    }
}
