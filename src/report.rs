//! Console rendering of an analysis report.

use crate::timeframe_selector::{AnalysisOutcome, AnalysisReport, TimeframeResult};
use anyhow::{Context, Result};

pub const NO_SIGNAL_MESSAGE: &str = "No strong signal detected.";

/// Human readable summary; with `show_all` every analysed timeframe is listed
/// after the best one.
pub fn render_text(report: &AnalysisReport, show_all: bool) -> String {
    let mut out = match report.outcome() {
        AnalysisOutcome::Best { timeframe, signals } => {
            let mut text = format!("Best Timeframe: {}\n", timeframe);
            for (name, label) in signals.entries() {
                text.push_str(&format!("{}: {}\n", name, label));
            }
            text
        }
        AnalysisOutcome::NoSignalDetected => format!("{}\n", NO_SIGNAL_MESSAGE),
    };

    if show_all && !report.results.is_empty() {
        out.push_str("\nAll analysed timeframes:\n");
        for result in &report.results {
            out.push_str(&render_result_line(result));
            out.push('\n');
        }
    }

    out
}

fn render_result_line(result: &TimeframeResult) -> String {
    let fmt_opt = |value: Option<f64>, decimals: usize| {
        value.map_or_else(|| "n/a".to_string(), |v| format!("{:.*}", decimals, v))
    };

    format!(
        "  {:>3}  score {:>2}  RSI {:>6}  K {:>4}  D {:>4}  ATR {:>10}  | {} | {} | {} | {}",
        result.timeframe.as_str(),
        result.score,
        fmt_opt(result.indicators.rsi, 2),
        fmt_opt(result.indicators.stoch_rsi_k, 2),
        fmt_opt(result.indicators.stoch_rsi_d, 2),
        fmt_opt(result.indicators.atr, 5),
        result.signals.rsi_signal,
        result.signals.stoch_rsi_signal,
        result.signals.volatility_signal,
        result.signals.hold_time,
    )
}

pub fn render_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize analysis report")
}
