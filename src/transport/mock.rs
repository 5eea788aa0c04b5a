//! Mock gateway backend.
//!
//! Answers requests from a fixed, ordered table of (path substring,
//! responder) pairs. Responders are pure functions returning canned
//! JSON: identical calls yield byte-identical payloads, and no I/O
//! happens anywhere on this path.
//!
//! The table deliberately wires only four endpoints. `/models/survival/train`
//! and `/federation/peers` have no responder and fall through to the
//! not-implemented error; callers of those operations see that error
//! until a real gateway exists.

use crate::error::GatewayError;
use serde_json::{json, Value};
use tracing::trace;

type Responder = fn() -> Value;

/// Ordered dispatch table. Scanned top to bottom; the first substring
/// match wins. The substrings are mutually exclusive by construction.
const ROUTES: &[(&str, Responder)] = &[
    ("/federation/aggregate", aggregate_fixture),
    ("/exploration/complement-stats", complement_stats_fixture),
    ("/exploration/conditional-tdigest", conditional_tdigest_fixture),
    ("/models/survival/predict", predict_fixture),
];

/// Resolve a request path to its canned payload.
///
/// Total over all paths: anything the table does not match resolves to
/// [`GatewayError::NotImplemented`].
pub fn dispatch(path: &str) -> Result<Value, GatewayError> {
    for (needle, responder) in ROUTES {
        if path.contains(needle) {
            trace!(path, route = needle, "mock dispatch hit");
            return Ok(responder());
        }
    }
    trace!(path, "mock dispatch miss");
    Err(GatewayError::NotImplemented)
}

/// Cohort survival summary: 412 drilling runs, ~18% censored.
fn aggregate_fixture() -> Value {
    json!({
        "survival": {
            "times": [0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 120.0, 140.0, 160.0, 180.0, 200.0],
            "values": [1.0, 0.97, 0.93, 0.88, 0.81, 0.72, 0.61, 0.49, 0.37, 0.26, 0.17]
        },
        "hazard": {
            "times": [0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 120.0, 140.0, 160.0, 180.0, 200.0],
            "values": [0.0010, 0.0016, 0.0024, 0.0035, 0.0049, 0.0068, 0.0092, 0.0121, 0.0155, 0.0196, 0.0243]
        },
        "percentiles": { "p10": 34.0, "p50": 118.0, "p90": 186.0 },
        "n_samples": 412,
        "censored_fraction": 0.18
    })
}

/// Feature contrasts between failed bits and the rest of the fleet.
///
/// Deltas are computed here rather than written as literals so the
/// `delta = group - complement` identity holds exactly in floating
/// point.
fn complement_stats_fixture() -> Value {
    let rows: [(&str, f64, f64, (f64, f64), (f64, f64)); 5] = [
        ("weight_on_bit", 28.4, 24.1, (22.0, 33.5), (19.8, 27.6)),
        ("rotary_speed", 142.0, 156.5, (118.0, 167.0), (139.0, 171.0)),
        ("torque", 9.8, 7.2, (7.1, 12.4), (5.6, 8.9)),
        ("mud_flow_rate", 610.0, 655.0, (540.0, 690.0), (602.0, 702.0)),
        ("rock_compressive_strength", 186.0, 121.0, (150.0, 215.0), (95.0, 148.0)),
    ];

    let stats: Vec<Value> = rows
        .iter()
        .map(|(feature, failed_mean, complement_mean, failed_iqr, complement_iqr)| {
            let failed_width = failed_iqr.1 - failed_iqr.0;
            let complement_width = complement_iqr.1 - complement_iqr.0;
            json!({
                "feature": feature,
                "failed_mean": failed_mean,
                "complement_mean": complement_mean,
                "delta_mean": failed_mean - complement_mean,
                "failed_iqr": { "q1": failed_iqr.0, "q3": failed_iqr.1 },
                "complement_iqr": { "q1": complement_iqr.0, "q3": complement_iqr.1 },
                "delta_iqr": failed_width - complement_width
            })
        })
        .collect();

    Value::Array(stats)
}

/// Binned weight-on-bit distribution split by outcome class. The two
/// classes come back with different edge grids, which consumers must
/// tolerate.
fn conditional_tdigest_fixture() -> Value {
    json!({
        "failed": {
            "edges": [0.0, 25.0, 50.0, 75.0, 100.0, 125.0, 150.0],
            "counts": [2, 9, 21, 34, 18, 7, 3]
        },
        "survived": {
            "edges": [0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0],
            "counts": [1, 4, 12, 30, 41, 26, 9]
        }
    })
}

/// Scenario prediction with at-horizon probabilities for the standard
/// 10/50/100/150 hour horizons.
fn predict_fixture() -> Value {
    json!({
        "curve": {
            "times": [0.0, 10.0, 25.0, 50.0, 75.0, 100.0, 125.0, 150.0],
            "values": [1.0, 0.98, 0.95, 0.88, 0.79, 0.68, 0.55, 0.42]
        },
        "at_horizon": {
            "10": 0.98,
            "50": 0.88,
            "100": 0.68,
            "150": 0.42
        }
    })
}
