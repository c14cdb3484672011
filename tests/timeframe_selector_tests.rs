// Timeframe selection against a mocked price source

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use mockall::predicate::{always, eq};
use mockall::{Sequence, mock};

use cryptosignals::market_data::{OhlcBar, PriceHistory, PriceHistorySource, TimeFrame};
use cryptosignals::signals::{RsiSignal, StochRsiSignal};
use cryptosignals::timeframe_selector::{AnalysisOutcome, TimeframeSelector};

mock! {
    pub Source {}

    #[async_trait]
    impl PriceHistorySource for Source {
        async fn fetch_history(
            &self,
            symbol: &str,
            timeframe: TimeFrame,
            limit: usize,
        ) -> Option<PriceHistory>;
    }
}

fn history_from_closes(symbol: &str, timeframe: TimeFrame, closes: &[f64]) -> PriceHistory {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            OhlcBar::new(
                start + Duration::minutes(15 * i as i64),
                close,
                close + 0.5,
                close - 0.5,
                close,
            )
        })
        .collect();
    PriceHistory::new(symbol, timeframe, bars)
}

// Gentle oscillation followed by eight bars moving `step` each
fn trend_break_closes(step: f64) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..80).map(|i| 100.0 + 2.0 * (i as f64 * 0.5).sin()).collect();
    for _ in 0..8 {
        let last = *closes.last().unwrap();
        closes.push(last + step);
    }
    closes
}

// Oversold RSI with %K at 0: scores +3
fn strong_buy_history(symbol: &str, timeframe: TimeFrame) -> PriceHistory {
    history_from_closes(symbol, timeframe, &trend_break_closes(-5.0))
}

// Overbought RSI with %K at 1: scores -3
fn strong_sell_history(symbol: &str, timeframe: TimeFrame) -> PriceHistory {
    history_from_closes(symbol, timeframe, &trend_break_closes(5.0))
}

// A long rally then three wobbles: RSI overbought, %K at 0.02 and %D not
// yet defined, so the labels cancel out to a score of 0
fn wobble_after_rally_history(symbol: &str, timeframe: TimeFrame) -> PriceHistory {
    let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    for step in [-3.0, 2.0, -1.0] {
        let last = *closes.last().unwrap();
        closes.push(last + step);
    }
    history_from_closes(symbol, timeframe, &closes)
}

fn short_history(symbol: &str, timeframe: TimeFrame) -> PriceHistory {
    let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
    history_from_closes(symbol, timeframe, &closes)
}

#[cfg(test)]
mod timeframe_selector_tests {
    use super::*;

    #[tokio::test]
    async fn test_all_timeframes_unavailable_is_no_signal() {
        let mut source = MockSource::new();
        source
            .expect_fetch_history()
            .times(4)
            .returning(|_, _, _| None);

        let report = TimeframeSelector::new(source).analyze("BTCUSDT").await;

        assert!(report.results.is_empty());
        assert_eq!(report.best_timeframe, None);
        assert_eq!(report.outcome(), AnalysisOutcome::NoSignalDetected);
    }

    #[tokio::test]
    async fn test_fetches_each_timeframe_in_order_with_default_limit() {
        let mut source = MockSource::new();
        let mut seq = Sequence::new();
        for &timeframe in TimeFrame::all() {
            source
                .expect_fetch_history()
                .withf(move |symbol, tf, limit| symbol == "ETHUSDT" && *tf == timeframe && *limit == 100)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _, _| None);
        }

        let report = TimeframeSelector::new(source).analyze("ETHUSDT").await;
        assert_eq!(report.symbol, "ETHUSDT");
    }

    #[tokio::test]
    async fn test_equal_scores_prefer_earliest_timeframe() {
        let mut source = MockSource::new();
        source
            .expect_fetch_history()
            .times(4)
            .returning(|symbol, tf, _| Some(strong_buy_history(symbol, tf)));

        let report = TimeframeSelector::new(source).analyze("SOLUSDT").await;

        assert_eq!(report.results.len(), 4);
        assert!(report.results.iter().all(|r| r.score == 3));
        assert_eq!(report.best_timeframe, Some(TimeFrame::Min15));
    }

    #[tokio::test]
    async fn test_skips_unusable_timeframes_and_picks_strongest() {
        let mut source = MockSource::new();
        source
            .expect_fetch_history()
            .with(always(), eq(TimeFrame::Min15), always())
            .returning(|symbol, tf, _| Some(strong_sell_history(symbol, tf)));
        source
            .expect_fetch_history()
            .with(always(), eq(TimeFrame::Hour1), always())
            .returning(|symbol, tf, _| Some(PriceHistory::new(symbol, tf, Vec::new())));
        source
            .expect_fetch_history()
            .with(always(), eq(TimeFrame::Hour4), always())
            .returning(|symbol, tf, _| Some(short_history(symbol, tf)));
        source
            .expect_fetch_history()
            .with(always(), eq(TimeFrame::Day1), always())
            .returning(|symbol, tf, _| Some(strong_buy_history(symbol, tf)));

        let report = TimeframeSelector::new(source).analyze("BTCUSDT").await;

        let analysed: Vec<TimeFrame> = report.results.iter().map(|r| r.timeframe).collect();
        assert_eq!(analysed, vec![TimeFrame::Min15, TimeFrame::Day1]);
        assert_eq!(report.result_for(TimeFrame::Min15).unwrap().score, -3);

        match report.outcome() {
            AnalysisOutcome::Best { timeframe, signals } => {
                assert_eq!(timeframe, TimeFrame::Day1);
                assert_eq!(signals.rsi_signal, RsiSignal::OversoldStrongBuy);
                assert_eq!(signals.stoch_rsi_signal, StochRsiSignal::StrongBuy);
                assert_eq!(signals.hold_time.label(), "Hold for 1-3 days");
            }
            other => panic!("Expected Day1 as best timeframe, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_negative_scores_never_beat_sentinel() {
        let mut source = MockSource::new();
        source
            .expect_fetch_history()
            .times(4)
            .returning(|symbol, tf, _| Some(strong_sell_history(symbol, tf)));

        let report = TimeframeSelector::new(source).analyze("DOGEUSDT").await;

        // Every timeframe is analysed and recorded, but none is recommended
        assert_eq!(report.results.len(), 4);
        let first = &report.results[0];
        assert_eq!(first.signals.rsi_signal, RsiSignal::OverboughtStrongSell);
        assert_eq!(first.signals.stoch_rsi_signal, StochRsiSignal::StrongSell);
        assert_eq!(first.signals.hold_time.label(), "Exit within hours");
        assert_eq!(report.outcome(), AnalysisOutcome::NoSignalDetected);
    }

    #[tokio::test]
    async fn test_custom_timeframe_order() {
        let mut source = MockSource::new();
        source
            .expect_fetch_history()
            .times(2)
            .returning(|symbol, tf, _| Some(strong_buy_history(symbol, tf)));

        let selector = TimeframeSelector::new(source).with_timeframes(vec![TimeFrame::Day1, TimeFrame::Hour1]);
        let report = selector.analyze("ADAUSDT").await;

        assert_eq!(report.best_timeframe, Some(TimeFrame::Day1));
    }

    #[tokio::test]
    async fn test_missing_stoch_rsi_d_still_scores_timeframe() {
        let mut source = MockSource::new();
        source
            .expect_fetch_history()
            .with(always(), eq(TimeFrame::Hour4), always())
            .returning(|symbol, tf, _| Some(wobble_after_rally_history(symbol, tf)));
        source
            .expect_fetch_history()
            .returning(|_, _, _| None);

        let report = TimeframeSelector::new(source).analyze("BTCUSDT").await;

        assert_eq!(report.results.len(), 1);
        let result = &report.results[0];
        assert_eq!(result.timeframe, TimeFrame::Hour4);
        assert_eq!(result.indicators.stoch_rsi_k, Some(0.02));
        assert_eq!(result.indicators.stoch_rsi_d, None);
        assert_eq!(result.signals.rsi_signal, RsiSignal::OverboughtStrongSell);
        assert_eq!(result.signals.stoch_rsi_signal, StochRsiSignal::StrongBuy);
        assert_eq!(result.score, 0);
        assert_eq!(report.best_timeframe, Some(TimeFrame::Hour4));
    }

    #[tokio::test]
    async fn test_single_timeframe_scoring_zero_is_best() {
        let mut source = MockSource::new();
        source
            .expect_fetch_history()
            .with(always(), eq(TimeFrame::Hour1), always())
            .times(1)
            .returning(|symbol, tf, _| Some(wobble_after_rally_history(symbol, tf)));

        let selector = TimeframeSelector::new(source).with_timeframes(vec![TimeFrame::Hour1]);
        let report = selector.analyze("XRPUSDT").await;

        assert_eq!(report.results[0].score, 0);
        match report.outcome() {
            AnalysisOutcome::Best { timeframe, signals } => {
                assert_eq!(timeframe, TimeFrame::Hour1);
                assert_eq!(signals.hold_time.label(), "Hold for 1-3 days");
            }
            other => panic!("Expected Hour1 as best timeframe, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_history_single_timeframe() {
        let selector = TimeframeSelector::new(MockSource::new());

        let result = selector
            .analyze_history(TimeFrame::Hour4, &strong_buy_history("BTCUSDT", TimeFrame::Hour4))
            .expect("strong buy history is long enough");
        assert_eq!(result.timeframe, TimeFrame::Hour4);
        assert_eq!(result.score, 3);
        assert!(result.indicators.is_complete());

        let skipped = selector.analyze_history(TimeFrame::Hour4, &short_history("BTCUSDT", TimeFrame::Hour4));
        assert!(skipped.is_none());
    }
}
