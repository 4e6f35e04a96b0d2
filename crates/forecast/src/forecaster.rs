use serde::{Deserialize, Serialize};

use restock_core::ValueObject;

/// Number of trailing periods averaged by default.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Default inflation applied to the trailing average (10%).
pub const DEFAULT_BUFFER_RATIO: f64 = 0.10;

/// Direction of the most recent movement in a sales series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

impl core::fmt::Display for Trend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Trend {
    type Err = restock_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increasing" => Ok(Trend::Increasing),
            "declining" => Ok(Trend::Declining),
            "stable" => Ok(Trend::Stable),
            other => Err(restock_core::DomainError::invalid_parameter(format!(
                "unknown trend: {other}"
            ))),
        }
    }
}

/// Next-period demand estimate plus trend label.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub next_period_demand: u64,
    pub trend: Trend,
}

impl ValueObject for ForecastResult {}

/// Trailing moving-average forecaster.
///
/// Model:
/// - Average the last `window_size` periods (fewer if the series is shorter).
/// - Inflate by `1 + buffer_ratio` and truncate toward zero.
/// - Label the trend from the last two points only.
///
/// This is a deliberately simple, explainable baseline. The buffer biases toward
/// overstocking since stockouts cost more than excess inventory.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Forecaster {
    window_size: usize,
    buffer_ratio: f64,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            buffer_ratio: DEFAULT_BUFFER_RATIO,
        }
    }
}

impl Forecaster {
    pub fn new(window_size: usize, buffer_ratio: f64) -> Self {
        Self::default()
            .with_window_size(window_size)
            .with_buffer_ratio(buffer_ratio)
    }

    /// A window of zero is treated as one period.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size.max(1);
        self
    }

    /// Non-finite or negative ratios are treated as no buffer.
    pub fn with_buffer_ratio(mut self, buffer_ratio: f64) -> Self {
        self.buffer_ratio = if buffer_ratio.is_finite() && buffer_ratio >= 0.0 {
            buffer_ratio
        } else {
            0.0
        };
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn buffer_ratio(&self) -> f64 {
        self.buffer_ratio
    }

    /// Forecast next-period demand for an oldest-first sales series.
    ///
    /// Never fails: an empty series forecasts zero demand with a stable trend.
    pub fn forecast(&self, sales: &[u64]) -> ForecastResult {
        if sales.is_empty() {
            return ForecastResult {
                next_period_demand: 0,
                trend: Trend::Stable,
            };
        }

        let w = self.window_size.min(sales.len());
        let recent = &sales[sales.len() - w..];
        let avg = mean(recent);

        // `as` saturates on overflow and truncates toward zero.
        let next_period_demand = (avg * (1.0 + self.buffer_ratio)) as u64;

        ForecastResult {
            next_period_demand,
            trend: classify_trend(sales),
        }
    }
}

/// Forecast with the default window (3) and buffer (10%).
pub fn forecast(sales: &[u64]) -> ForecastResult {
    Forecaster::default().forecast(sales)
}

/// One-step derivative over the final two points; intentionally noise-sensitive.
fn classify_trend(sales: &[u64]) -> Trend {
    match sales {
        [.., prior, last] if last > prior => Trend::Increasing,
        [.., prior, last] if last < prior => Trend::Declining,
        _ => Trend::Stable,
    }
}

fn mean(xs: &[u64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().map(|&x| x as f64).sum::<f64>() / (xs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_series_forecasts_zero_and_stable() {
        let result = forecast(&[]);
        assert_eq!(
            result,
            ForecastResult {
                next_period_demand: 0,
                trend: Trend::Stable,
            }
        );
    }

    #[test]
    fn rising_series_truncates_buffered_average() {
        // mean(10, 12, 14) = 12; 12 * 1.1 = 13.2 -> 13
        let result = forecast(&[10, 12, 14]);
        assert_eq!(result.next_period_demand, 13);
        assert_eq!(result.trend, Trend::Increasing);
    }

    #[test]
    fn falling_last_point_is_declining() {
        let result = forecast(&[10, 12, 8]);
        assert_eq!(result.next_period_demand, 11);
        assert_eq!(result.trend, Trend::Declining);
    }

    #[test]
    fn only_trailing_window_is_averaged() {
        // Older spikes are outside the window.
        let result = forecast(&[1000, 1000, 4, 5, 9]);
        assert_eq!(result.next_period_demand, 6);
    }

    #[test]
    fn short_series_shrinks_window() {
        // Single point: mean = 7, 7 * 1.1 = 7.7 -> 7, trend stable.
        assert_eq!(
            forecast(&[7]),
            ForecastResult {
                next_period_demand: 7,
                trend: Trend::Stable,
            }
        );

        // Two points: mean(4, 6) = 5, 5 * 1.1 = 5.5 -> 5.
        let two = forecast(&[4, 6]);
        assert_eq!(two.next_period_demand, 5);
        assert_eq!(two.trend, Trend::Increasing);
    }

    #[test]
    fn equal_last_points_are_stable() {
        assert_eq!(forecast(&[3, 9, 9]).trend, Trend::Stable);
    }

    #[test]
    fn zero_window_is_treated_as_one() {
        let f = Forecaster::default().with_window_size(0);
        assert_eq!(f.window_size(), 1);
        // last point only: 20 * 1.1 = 22
        assert_eq!(f.forecast(&[1, 2, 20]).next_period_demand, 22);
    }

    #[test]
    fn invalid_buffer_ratio_falls_back_to_zero() {
        for ratio in [-0.5, f64::NAN, f64::INFINITY] {
            let f = Forecaster::default().with_buffer_ratio(ratio);
            assert_eq!(f.buffer_ratio(), 0.0);
            assert_eq!(f.forecast(&[10, 10, 10]).next_period_demand, 10);
        }
    }

    #[test]
    fn custom_window_and_buffer() {
        let f = Forecaster::new(5, 0.0);
        // mean(2, 4, 6, 8, 10) = 6
        assert_eq!(f.forecast(&[100, 2, 4, 6, 8, 10]).next_period_demand, 6);
    }

    #[test]
    fn trend_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(Trend::Declining).unwrap(),
            serde_json::json!("declining")
        );
        assert_eq!("increasing".parse::<Trend>().unwrap(), Trend::Increasing);
        assert!("sideways".parse::<Trend>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn demand_is_truncated_buffered_mean_of_last_three(
            sales in prop::collection::vec(0u64..100_000u64, 1..30)
        ) {
            let w = sales.len().min(3);
            let tail = &sales[sales.len() - w..];
            let avg = tail.iter().map(|&x| x as f64).sum::<f64>() / w as f64;
            let expected = (avg * 1.1).floor() as u64;

            prop_assert_eq!(forecast(&sales).next_period_demand, expected);
        }

        #[test]
        fn trend_follows_sign_of_last_step(
            sales in prop::collection::vec(0u64..1_000u64, 2..30)
        ) {
            let n = sales.len();
            let trend = forecast(&sales).trend;
            let expected = match sales[n - 1].cmp(&sales[n - 2]) {
                core::cmp::Ordering::Greater => Trend::Increasing,
                core::cmp::Ordering::Less => Trend::Declining,
                core::cmp::Ordering::Equal => Trend::Stable,
            };
            prop_assert_eq!(trend, expected);
        }
    }
}
