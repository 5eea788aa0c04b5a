//! Derived-state helpers for dashboard views.
//!
//! Small shaping functions that turn gateway payloads into the forms
//! chart components consume directly.

use crate::models::{ComplementStat, Curve, PredictionResult};

/// Zip a curve into chart-ready `(time, value)` points.
///
/// If the curve violates its pairing invariant the result is truncated
/// to the shorter side rather than panicking.
pub fn curve_points(curve: &Curve) -> Vec<(f64, f64)> {
    curve
        .times
        .iter()
        .copied()
        .zip(curve.values.iter().copied())
        .collect()
}

/// Turn the at-horizon map into numerically ordered `(horizon, probability)`
/// pairs. Keys that are not string-encoded integers are skipped.
pub fn horizon_series(prediction: &PredictionResult) -> Vec<(u32, f64)> {
    let mut series: Vec<(u32, f64)> = prediction
        .at_horizon
        .iter()
        .filter_map(|(key, value)| key.parse::<u32>().ok().map(|h| (h, *value)))
        .collect();
    series.sort_unstable_by_key(|(horizon, _)| *horizon);
    series
}

/// Rank feature contrasts by influence: largest `|delta_mean|` first.
pub fn rank_by_influence(stats: &[ComplementStat]) -> Vec<ComplementStat> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| b.delta_mean.abs().total_cmp(&a.delta_mean.abs()));
    ranked
}
