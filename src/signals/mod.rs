//! Signal Classification Module
//!
//! Maps indicator readings onto the categorical trade signals reported to the
//! user: an RSI signal, a Stochastic RSI signal, a volatility signal and an
//! estimated holding time.

pub mod classifier;
pub mod core;

pub use self::classifier::SignalClassifier;
pub use self::core::{HoldTime, RsiSignal, SignalSet, StochRsiSignal, VolatilitySignal};
