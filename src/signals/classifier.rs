//! Threshold classification of indicator readings.

use crate::indicators::IndicatorSnapshot;
use crate::signals::core::{HoldTime, RsiSignal, SignalSet, StochRsiSignal, VolatilitySignal};

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;
const STOCH_RSI_OVERBOUGHT: f64 = 0.8;
const STOCH_RSI_OVERSOLD: f64 = 0.2;
const HIGH_VOLATILITY_ATR: f64 = 0.002;

/// Stateless mapping from indicator values to a `SignalSet`.
///
/// All comparisons are strict, so a reading exactly on a threshold falls to
/// the non-extreme label.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalClassifier;

impl SignalClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, rsi: f64, stoch_rsi_k: f64, stoch_rsi_d: f64, atr: f64) -> SignalSet {
        let rsi_signal = Self::classify_rsi(rsi);
        let stoch_rsi_signal = Self::classify_stoch_rsi(stoch_rsi_k, stoch_rsi_d);

        let mut signals = SignalSet {
            rsi_signal,
            stoch_rsi_signal,
            volatility_signal: Self::classify_volatility(atr),
            hold_time: HoldTime::WaitForClearSignal,
        };
        signals.hold_time = Self::estimate_hold_time(&signals);
        signals
    }

    /// Classify a snapshot, or `None` if RSI, %K or ATR is missing.
    ///
    /// A missing %D never counts as a bullish crossover, so a non-extreme %K
    /// reads as `Sell` in that case.
    pub fn classify_snapshot(&self, snapshot: &IndicatorSnapshot) -> Option<SignalSet> {
        Some(self.classify(
            snapshot.rsi?,
            snapshot.stoch_rsi_k?,
            snapshot.stoch_rsi_d.unwrap_or(f64::NAN),
            snapshot.atr?,
        ))
    }

    pub fn classify_rsi(rsi: f64) -> RsiSignal {
        if rsi > RSI_OVERBOUGHT {
            RsiSignal::OverboughtStrongSell
        } else if rsi < RSI_OVERSOLD {
            RsiSignal::OversoldStrongBuy
        } else {
            RsiSignal::Neutral
        }
    }

    pub fn classify_stoch_rsi(k: f64, d: f64) -> StochRsiSignal {
        if k > STOCH_RSI_OVERBOUGHT {
            StochRsiSignal::StrongSell
        } else if k < STOCH_RSI_OVERSOLD {
            StochRsiSignal::StrongBuy
        } else if k > d {
            StochRsiSignal::Buy
        } else {
            StochRsiSignal::Sell
        }
    }

    pub fn classify_volatility(atr: f64) -> VolatilitySignal {
        if atr == 0.0 {
            VolatilitySignal::Sideways
        } else if atr > HIGH_VOLATILITY_ATR {
            VolatilitySignal::HighVolatility
        } else {
            VolatilitySignal::StableMarket
        }
    }

    /// Buy wording wins over sell wording, checked on label text
    pub fn estimate_hold_time(signals: &SignalSet) -> HoldTime {
        if signals.either_contains("Buy") {
            HoldTime::HoldOneToThreeDays
        } else if signals.either_contains("Sell") {
            HoldTime::ExitWithinHours
        } else {
            HoldTime::WaitForClearSignal
        }
    }
}
