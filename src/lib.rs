//! dem-client: typed client for the DEM federated drilling-analytics
//! gateway.
//!
//! Dashboard views for oil-drilling-bit survival analysis consume this
//! crate to fetch survival summaries, feature contrasts, conditional
//! distributions and what-if predictions. The client carries one
//! mutable connection configuration and routes requests through either
//! a deterministic in-memory mock backend or an HTTP transport aimed
//! at a real gateway deployment.
//!
//! All failures come back as data: every operation returns a
//! [`GatewayResponse`] with exactly one of `data` or `error` populated.
//!
//! ```no_run
//! use dem_client::{CohortFilter, DemClient};
//!
//! # async fn example() {
//! let client = DemClient::mock();
//! let summary = client
//!     .aggregate(
//!         "proj-42",
//!         &CohortFilter::all(),
//!         &["survival".to_string()],
//!         &[10, 50, 100, 150],
//!     )
//!     .await;
//!
//! match (summary.data, summary.error) {
//!     (Some(summary), _) => println!("{} samples", summary.n_samples),
//!     (_, Some(message)) => eprintln!("gateway error: {message}"),
//!     _ => unreachable!(),
//! }
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transform;
pub mod transport;

pub use client::DemClient;
pub use config::{ConfigPatch, GatewayConfig};
pub use error::GatewayError;
pub use models::{
    Algorithm, BinSeries, CohortFilter, ComplementStat, ConditionalDistribution, Curve,
    GatewayResponse, Iqr, Percentiles, PredictionResult, SurvivalSummary, TrainResult,
};
