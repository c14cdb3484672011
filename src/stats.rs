use statrs::statistics::Statistics;

/// Apply `reducer` over every trailing window of exactly `window` points.
///
/// Positions that do not yet have a full window are `NaN`, as is every
/// output when `window` is zero.
fn rolling_apply<F>(values: &[f64], window: usize, reducer: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                f64::NAN
            } else {
                reducer(&values[i + 1 - window..=i])
            }
        })
        .collect()
}

/// Rolling mean over a fixed trailing window
///
/// # Arguments
/// * `values` - Series ordered oldest first
/// * `window` - Number of trailing points averaged at each position
///
/// # Returns
/// * `Vec<f64>` - Same length as `values`; `NaN` where the window is
///   incomplete or contains a `NaN`
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| Statistics::mean(w))
}

/// Rolling mean whose window grows from one point up to `window` at the
/// start of the series, then slides.
pub fn expanding_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let size = window.min(i + 1);
            Statistics::mean(&values[i + 1 - size..=i])
        })
        .collect()
}

/// Rolling minimum; a window containing `NaN` yields `NaN`.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| Statistics::min(w))
}

/// Rolling maximum; a window containing `NaN` yields `NaN`.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| Statistics::max(w))
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `None` for `NaN` and infinities
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean_requires_full_window() {
        let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(means[0].is_nan());
        assert!(means[1].is_nan());
        assert!((means[2] - 2.0).abs() < 1e-12);
        assert!((means[3] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_mean_propagates_nan() {
        let means = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(means[1].is_nan());
        assert!(means[2].is_nan());
        assert!((means[3] - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_expanding_rolling_mean_grows_then_slides() {
        let means = expanding_rolling_mean(&[2.0, 4.0, 6.0, 8.0], 2);
        assert!((means[0] - 2.0).abs() < 1e-12);
        assert!((means[1] - 3.0).abs() < 1e-12);
        assert!((means[2] - 5.0).abs() < 1e-12);
        assert!((means[3] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_min_max() {
        let values = [5.0, 1.0, 4.0, 2.0, 8.0];
        let mins = rolling_min(&values, 3);
        let maxs = rolling_max(&values, 3);
        assert!(mins[1].is_nan());
        assert_eq!(mins[2], 1.0);
        assert_eq!(maxs[2], 5.0);
        assert_eq!(mins[4], 2.0);
        assert_eq!(maxs[4], 8.0);
    }

    #[test]
    fn test_rolling_min_with_nan_window() {
        let mins = rolling_min(&[f64::NAN, 1.0, 2.0, 3.0], 2);
        assert!(mins[1].is_nan());
        assert_eq!(mins[2], 1.0);
    }

    #[test]
    fn test_zero_window_is_undefined() {
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.12345678, 5), 0.12346);
        assert_eq!(round_to(0.456, 2), 0.46);
        assert_eq!(round_to(1.0, 2), 1.0);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(1.5), Some(1.5));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::INFINITY), None);
    }
}
