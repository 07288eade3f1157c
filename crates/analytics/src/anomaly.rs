use crate::stats::population_stats;
use core_types::AnomalyKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Below this many points the 2-sigma band is statistically meaningless and
/// detection returns no anomalies at all.
pub const MIN_ANOMALY_POINTS: usize = 3;

/// A flagged point in a series, positioned by index so the caller can map it
/// back to whatever labels (dates) the series carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPoint {
    pub index: usize,
    pub value: f64,
    /// Mean of the whole series the point was judged against.
    pub mean: f64,
    /// Distance from the mean in population standard deviations.
    pub deviations: f64,
    pub kind: AnomalyKind,
}

/// Flags every point at or beyond `mean ± 2σ` of the series.
///
/// σ is the population standard deviation (divide by N). A series with zero
/// spread flags nothing. The lower threshold is clamped at zero: revenue
/// cannot go negative, so a band below zero would never flag anything.
pub fn detect_anomalies(values: &[f64]) -> Vec<AnomalyPoint> {
    if values.len() < MIN_ANOMALY_POINTS {
        return Vec::new();
    }

    let Some(stats) = population_stats(values) else {
        return Vec::new();
    };
    if stats.std_dev <= 0.0 {
        return Vec::new();
    }

    let upper = stats.mean + 2.0 * stats.std_dev;
    let lower = (stats.mean - 2.0 * stats.std_dev).max(0.0);

    let anomalies: Vec<AnomalyPoint> = values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v >= upper || v <= lower)
        .map(|(index, &value)| AnomalyPoint {
            index,
            value,
            mean: stats.mean,
            deviations: (value - stats.mean).abs() / stats.std_dev,
            kind: if value >= upper {
                AnomalyKind::High
            } else {
                AnomalyKind::Low
            },
        })
        .collect();

    debug!(
        points = values.len(),
        flagged = anomalies.len(),
        "anomaly detection pass"
    );

    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_the_spike_day() {
        // Four quiet days and one spike: mean 280, sigma 360, so 1000 sits
        // right on the upper band and must still be flagged.
        let anomalies = detect_anomalies(&[100.0, 100.0, 100.0, 100.0, 1000.0]);
        assert_eq!(anomalies.len(), 1);

        let spike = &anomalies[0];
        assert_eq!(spike.index, 4);
        assert_eq!(spike.kind, AnomalyKind::High);
        assert!((spike.mean - 280.0).abs() < 1e-9);
        assert!((spike.deviations - 2.0).abs() < 1e-9);
    }

    #[test]
    fn flags_a_collapsed_day_as_low() {
        let series = [500.0, 480.0, 510.0, 490.0, 505.0, 495.0, 10.0];
        let anomalies = detect_anomalies(&series);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].index, 6);
        assert_eq!(anomalies[0].kind, AnomalyKind::Low);
    }

    #[test]
    fn flat_series_flags_nothing() {
        assert!(detect_anomalies(&[200.0, 200.0, 200.0, 200.0]).is_empty());
    }

    #[test]
    fn too_few_points_yields_empty() {
        assert!(detect_anomalies(&[100.0, 1000.0]).is_empty());
        assert!(detect_anomalies(&[]).is_empty());
    }
}
