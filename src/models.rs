//! Wire models for the analytics gateway.
//!
//! This module contains the payload shapes exchanged with the gateway:
//! survival summaries, predictions, feature contrasts, conditional
//! distributions, and the uniform response wrapper every request
//! method returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Uniform result wrapper for every gateway call.
///
/// Exactly one of `data` and `error` is meaningful per call: success
/// populates `data`, any failure populates `error` with a
/// human-readable message. Callers must never assume partial data is
/// present alongside an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse<T> {
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> GatewayResponse<T> {
    /// Successful response carrying a payload.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Failed response carrying a message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> From<crate::error::GatewayError> for GatewayResponse<T> {
    fn from(err: crate::error::GatewayError) -> Self {
        Self::err(err.to_string())
    }
}

/// An ordered curve: time points paired with values.
///
/// Used for both survival probabilities and hazard rates; the two
/// curves of a summary may use different time grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Elapsed-time points, non-decreasing.
    pub times: Vec<f64>,
    /// Value at each time point; same length as `times`.
    pub values: Vec<f64>,
}

impl Curve {
    /// True when times and values pair up and times never step backwards.
    pub fn is_consistent(&self) -> bool {
        self.times.len() == self.values.len()
            && self.times.windows(2).all(|w| w[0] <= w[1])
    }

    /// Number of points in the curve.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// p10/p50/p90 survival-time percentiles for a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Aggregate survival and hazard curves for a cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalSummary {
    /// Kaplan-Meier style survival curve.
    pub survival: Curve,
    /// Hazard-rate curve; may use a different time grid than `survival`.
    pub hazard: Curve,
    /// Survival-time percentile triple.
    pub percentiles: Percentiles,
    /// Number of samples in the cohort.
    pub n_samples: u64,
    /// Fraction of samples censored within the study window, in [0, 1].
    pub censored_fraction: f64,
}

impl SurvivalSummary {
    /// True when both curves satisfy their pairing and ordering
    /// invariants.
    pub fn is_consistent(&self) -> bool {
        self.survival.is_consistent() && self.hazard.is_consistent()
    }
}

/// Model-predicted survival curve for one what-if scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted survival curve.
    pub curve: Curve,
    /// Predicted survival probability at each requested horizon, keyed
    /// by the string-encoded integer horizon value.
    pub at_horizon: BTreeMap<String, f64>,
}

/// Per-feature contrast between a condition group and its complement.
///
/// Sign convention: `delta_mean = failed_mean - complement_mean`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplementStat {
    /// Feature name.
    pub feature: String,
    /// Mean within the condition group (e.g. failed bits).
    pub failed_mean: f64,
    /// Mean over everything outside the condition group.
    pub complement_mean: f64,
    /// `failed_mean - complement_mean`.
    pub delta_mean: f64,
    /// Interquartile range within the condition group.
    pub failed_iqr: Iqr,
    /// Interquartile range over the complement.
    pub complement_iqr: Iqr,
    /// Difference of the two IQR widths.
    pub delta_iqr: f64,
}

/// First and third quartile of a feature's distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Iqr {
    pub q1: f64,
    pub q3: f64,
}

impl Iqr {
    /// Width of the interquartile range.
    pub fn width(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Binned counts of one feature, split by outcome class.
///
/// The two series conceptually share a binning scheme but the gateway
/// may return different edge values for each class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalDistribution {
    /// Bins for the failed class.
    pub failed: BinSeries,
    /// Bins for the survived class.
    pub survived: BinSeries,
}

/// One class's aligned (bin edge, count) pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSeries {
    /// Left edge of each bin, non-decreasing.
    pub edges: Vec<f64>,
    /// Count per bin; same length as `edges`.
    pub counts: Vec<u64>,
}

impl BinSeries {
    pub fn is_consistent(&self) -> bool {
        self.edges.len() == self.counts.len()
            && self.edges.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Outcome of a survival-model training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResult {
    /// Identifier for the trained model, used by `predict`.
    pub model_id: String,
    /// Fitted model parameters by name.
    pub parameters: BTreeMap<String, f64>,
    /// Evaluation metrics by name.
    pub metrics: BTreeMap<String, f64>,
}

/// Survival-model family supported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Weibull,
    Cox,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Weibull => write!(f, "weibull"),
            Algorithm::Cox => write!(f, "cox"),
        }
    }
}

/// Opaque structured predicate selecting a population subset.
///
/// The client serializes the filter into request bodies verbatim; its
/// structure is interpreted by the gateway, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CohortFilter(pub serde_json::Value);

impl CohortFilter {
    /// Filter matching the whole population.
    pub fn all() -> Self {
        Self(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_ok_has_no_error() {
        let response = GatewayResponse::ok(42u32);
        assert!(response.is_ok());
        assert!(!response.is_err());
        assert_eq!(response.data, Some(42));
        assert_eq!(response.error, None);
    }

    #[test]
    fn test_response_err_has_no_data() {
        let response: GatewayResponse<u32> = GatewayResponse::err("boom");
        assert!(response.is_err());
        assert_eq!(response.data, None);
        assert_eq!(response.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_response_serializes_without_absent_side() {
        let response: GatewayResponse<u32> = GatewayResponse::err("boom");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "error": "boom" }));
    }

    #[test]
    fn test_curve_consistency() {
        let good = Curve {
            times: vec![0.0, 10.0, 10.0, 20.0],
            values: vec![1.0, 0.9, 0.85, 0.7],
        };
        assert!(good.is_consistent());

        let unpaired = Curve {
            times: vec![0.0, 10.0],
            values: vec![1.0],
        };
        assert!(!unpaired.is_consistent());

        let backwards = Curve {
            times: vec![0.0, 20.0, 10.0],
            values: vec![1.0, 0.8, 0.9],
        };
        assert!(!backwards.is_consistent());
    }

    #[test]
    fn test_algorithm_serde_lowercase() {
        assert_eq!(serde_json::to_value(Algorithm::Weibull).unwrap(), json!("weibull"));
        assert_eq!(serde_json::to_value(Algorithm::Cox).unwrap(), json!("cox"));
    }

    #[test]
    fn test_cohort_filter_is_transparent() {
        let filter = CohortFilter(json!({ "bit_type": "PDC" }));
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "bit_type": "PDC" })
        );
    }

    #[test]
    fn test_iqr_width() {
        let iqr = Iqr { q1: 10.0, q3: 30.0 };
        assert_eq!(iqr.width(), 20.0);
    }
}
