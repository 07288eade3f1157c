use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Computes the mean and population standard deviation (divide by N, not
/// N-1) of a series. Returns `None` on empty input.
///
/// The population form is deliberate: the daily revenue series under
/// analysis is the whole period, not a sample of it, and the anomaly
/// thresholds depend on matching this definition exactly.
pub fn population_stats(values: &[f64]) -> Option<SeriesStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

    Some(SeriesStats {
        mean,
        std_dev: variance.sqrt(),
    })
}

/// A fitted degree-1 trend line over (index, value) pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// The fitted value at position `x`.
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares fit of a line to `(0, values[0]) .. (n-1,
/// values[n-1])`, via the closed-form normal equations.
///
/// Used to overlay a trend line on a time series chart.
pub fn linear_trend(values: &[f64]) -> Result<TrendLine, AnalyticsError> {
    let n = values.len();
    if n < 2 {
        return Err(AnalyticsError::NotEnoughData(format!(
            "trend fit needs at least 2 points, got {}",
            n
        )));
    }

    let n_f = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
    let sum_xx: f64 = (0..n).map(|i| (i * i) as f64).sum();

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(AnalyticsError::Degenerate("linear_trend".into()));
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;

    Ok(TrendLine { slope, intercept })
}

/// Standard Pearson correlation coefficient over two equal-length series.
///
/// Returns `None` when the lengths differ, fewer than 2 pairs are given, or
/// either input has zero variance. A zero-variance input would make the
/// coefficient NaN; callers treat `None` as "no correlation to report"
/// rather than an error.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_stats_of_flat_series() {
        let stats = population_stats(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn population_stats_divides_by_n() {
        // Population sigma = sqrt(129600) = 360; the sample form would give
        // sqrt(162000) instead.
        let stats = population_stats(&[100.0, 100.0, 100.0, 100.0, 1000.0]).unwrap();
        assert!((stats.mean - 280.0).abs() < 1e-9);
        assert!((stats.std_dev - 360.0).abs() < 1e-9);
    }

    #[test]
    fn population_stats_empty_is_none() {
        assert!(population_stats(&[]).is_none());
    }

    #[test]
    fn linear_trend_recovers_exact_line() {
        // y = 3x + 2
        let trend = linear_trend(&[2.0, 5.0, 8.0, 11.0]).unwrap();
        assert!((trend.slope - 3.0).abs() < 1e-9);
        assert!((trend.intercept - 2.0).abs() < 1e-9);
        assert!((trend.value_at(10.0) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn linear_trend_of_flat_series_is_flat() {
        let trend = linear_trend(&[7.0, 7.0, 7.0]).unwrap();
        assert!(trend.slope.abs() < 1e-9);
        assert!((trend.intercept - 7.0).abs() < 1e-9);
    }

    #[test]
    fn linear_trend_needs_two_points() {
        assert!(matches!(
            linear_trend(&[1.0]),
            Err(AnalyticsError::NotEnoughData(_))
        ));
    }

    #[test]
    fn pearson_perfect_positive() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 4.0, 6.0, 8.0, 10.0];
        let r = pearson_correlation(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_perfect_negative() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [10.0, 8.0, 6.0, 4.0, 2.0];
        let r = pearson_correlation(&xs, &ys).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_zero_variance_is_none() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [5.0, 5.0, 5.0];
        assert!(pearson_correlation(&xs, &ys).is_none());
    }

    #[test]
    fn pearson_mismatched_lengths_is_none() {
        assert!(pearson_correlation(&[1.0, 2.0], &[1.0]).is_none());
        assert!(pearson_correlation(&[1.0], &[1.0]).is_none());
    }
}
