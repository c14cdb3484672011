//! Multi-timeframe analysis: run the indicators and classifier on each
//! timeframe in turn, score the resulting signals and keep the strongest.

use crate::config::AppConfig;
use crate::indicators::{IndicatorCalculator, IndicatorSnapshot};
use crate::market_data::{PriceHistory, PriceHistorySource, TimeFrame};
use crate::signals::{SignalClassifier, SignalSet};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Score a timeframe must beat to become the best one
pub const INITIAL_BEST_SCORE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeResult {
    pub timeframe: TimeFrame,
    pub indicators: IndicatorSnapshot,
    pub signals: SignalSet,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Best {
        timeframe: TimeFrame,
        signals: SignalSet,
    },
    NoSignalDetected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<TimeframeResult>, // analysed timeframes, in analysis order
    pub best_timeframe: Option<TimeFrame>,
}

impl AnalysisReport {
    pub fn result_for(&self, timeframe: TimeFrame) -> Option<&TimeframeResult> {
        self.results.iter().find(|r| r.timeframe == timeframe)
    }

    pub fn best_result(&self) -> Option<&TimeframeResult> {
        self.best_timeframe.and_then(|tf| self.result_for(tf))
    }

    pub fn outcome(&self) -> AnalysisOutcome {
        match self.best_result() {
            Some(best) => AnalysisOutcome::Best {
                timeframe: best.timeframe,
                signals: best.signals,
            },
            None => AnalysisOutcome::NoSignalDetected,
        }
    }
}

/// Signal strength of a timeframe.
///
/// Rules match on label substrings and are not exclusive: "Strong Buy" also
/// contains "Buy", so a strong buy earns both the +2 and the +1.
pub fn score_signals(signals: &SignalSet) -> i32 {
    let mut score = 0;
    if signals.either_contains("Strong Buy") {
        score += 2;
    }
    if signals.either_contains("Buy") {
        score += 1;
    }
    if signals.either_contains("Strong Sell") {
        score -= 2;
    }
    if signals.either_contains("Sell") {
        score -= 1;
    }
    score
}

/// Running best-so-far; only a strictly greater score replaces the holder,
/// so earlier timeframes win ties.
#[derive(Debug, Clone, Copy)]
struct BestSoFar {
    timeframe: Option<TimeFrame>,
    score: i32,
}

impl BestSoFar {
    fn new() -> Self {
        Self {
            timeframe: None,
            score: INITIAL_BEST_SCORE,
        }
    }

    fn offer(&mut self, timeframe: TimeFrame, score: i32) -> bool {
        if score > self.score {
            self.timeframe = Some(timeframe);
            self.score = score;
            true
        } else {
            false
        }
    }
}

/// Pick the best timeframe from results given in analysis order
pub fn select_best(results: &[TimeframeResult]) -> Option<TimeFrame> {
    let mut best = BestSoFar::new();
    for result in results {
        best.offer(result.timeframe, result.score);
    }
    best.timeframe
}

pub struct TimeframeSelector<S> {
    source: S,
    calculator: IndicatorCalculator,
    classifier: SignalClassifier,
    timeframes: Vec<TimeFrame>,
    history_limit: usize,
}

impl<S: PriceHistorySource> TimeframeSelector<S> {
    /// Selector over the default timeframes, indicator periods and limit
    pub fn new(source: S) -> Self {
        Self::from_config(source, &AppConfig::default())
    }

    pub fn from_config(source: S, config: &AppConfig) -> Self {
        Self {
            source,
            calculator: IndicatorCalculator::from(&config.indicators),
            classifier: SignalClassifier::new(),
            timeframes: config.analysis.timeframes.clone(),
            history_limit: config.analysis.history_limit,
        }
    }

    pub fn with_timeframes(mut self, timeframes: Vec<TimeFrame>) -> Self {
        self.timeframes = timeframes;
        self
    }

    /// Analyse `symbol` on every configured timeframe, one fetch at a time.
    ///
    /// Unavailable data and short histories skip that timeframe; the run
    /// itself never fails.
    pub async fn analyze(&self, symbol: &str) -> AnalysisReport {
        info!("Analyzing {} across {} timeframes", symbol, self.timeframes.len());

        let mut results = Vec::new();
        let mut best = BestSoFar::new();

        for &timeframe in &self.timeframes {
            let history = match self
                .source
                .fetch_history(symbol, timeframe, self.history_limit)
                .await
            {
                Some(history) if !history.is_empty() => history,
                _ => {
                    warn!("No usable price data for {} on {}, skipping", symbol, timeframe);
                    continue;
                }
            };

            let Some(result) = self.analyze_history(timeframe, &history) else {
                continue;
            };

            if best.offer(timeframe, result.score) {
                debug!("{} is the best timeframe so far (score {})", timeframe, result.score);
            }
            results.push(result);
        }

        match best.timeframe {
            Some(tf) => info!("Best timeframe for {}: {} (score {})", symbol, tf, best.score),
            None => info!("No timeframe for {} beat the score threshold", symbol),
        }

        AnalysisReport {
            symbol: symbol.to_string(),
            generated_at: Utc::now(),
            results,
            best_timeframe: best.timeframe,
        }
    }

    /// Indicators, signals and score for one timeframe's history, or `None`
    /// when the history is too short for any required indicator
    pub fn analyze_history(&self, timeframe: TimeFrame, history: &PriceHistory) -> Option<TimeframeResult> {
        let indicators = self.calculator.calculate_snapshot(history);

        let Some(signals) = self.classifier.classify_snapshot(&indicators) else {
            debug!(
                "Insufficient history on {} ({} bars): {:?}",
                timeframe,
                history.len(),
                indicators
            );
            return None;
        };

        let score = score_signals(&signals);
        info!(
            "{}: RSI={:.2} K={:.2} D={:.2} ATR={:.5} -> {} / {} / {} (score {})",
            timeframe,
            indicators.rsi.unwrap_or_default(),
            indicators.stoch_rsi_k.unwrap_or_default(),
            indicators.stoch_rsi_d.unwrap_or_default(),
            indicators.atr.unwrap_or_default(),
            signals.rsi_signal,
            signals.stoch_rsi_signal,
            signals.volatility_signal,
            score
        );

        Some(TimeframeResult {
            timeframe,
            indicators,
            signals,
            score,
        })
    }
}
