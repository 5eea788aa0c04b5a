//! The typed gateway client.
//!
//! `DemClient` owns one connection configuration and a backend, and
//! exposes the six gateway operations. Every operation returns a
//! [`GatewayResponse`]; faults of any kind (missing configuration,
//! serialization, transport, unimplemented mock route) come back as an
//! error-wrapped response, never as a panic or a raw `Err`.
//!
//! Construct one instance per consumer and pass it where it is needed;
//! there is no process-global client.

use crate::config::{ConfigPatch, GatewayConfig};
use crate::error::GatewayError;
use crate::models::{
    Algorithm, CohortFilter, ComplementStat, ConditionalDistribution, GatewayResponse,
    PredictionResult, SurvivalSummary, TrainResult,
};
use crate::transport::{http::HttpTransport, http::DEFAULT_TIMEOUT, Backend, Method, RequestEnvelope};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Client for the DEM federated analytics gateway.
pub struct DemClient {
    config: Option<GatewayConfig>,
    backend: Backend,
}

/// Body of an aggregate request. The cohort filter, metric names and
/// horizons are serialized for the gateway even though the mock backend
/// does not vary its answer on them.
#[derive(Debug, Serialize)]
struct AggregateRequest<'a> {
    cohort: &'a CohortFilter,
    metrics: &'a [String],
    horizons: &'a [u32],
}

#[derive(Debug, Serialize)]
struct ComplementStatsRequest<'a> {
    cohort: &'a CohortFilter,
    condition: &'a str,
    features: &'a [String],
}

#[derive(Debug, Serialize)]
struct ConditionalTDigestRequest<'a> {
    feature: &'a str,
    class_field: &'a str,
    bins: usize,
}

#[derive(Debug, Serialize)]
struct TrainRequest<'a> {
    algorithm: Algorithm,
    label_field: &'a str,
    censor_field: &'a str,
    features: &'a [String],
    cohort: &'a CohortFilter,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    model_id: &'a str,
    features: &'a BTreeMap<String, f64>,
    horizons: &'a [u32],
}

impl DemClient {
    /// Client backed by the deterministic in-memory mock, with a
    /// default configuration.
    pub fn mock() -> Self {
        Self {
            config: Some(GatewayConfig::default()),
            backend: Backend::Mock,
        }
    }

    /// Client backed by the HTTP transport, aimed at a real gateway.
    pub fn connect(config: GatewayConfig) -> Result<Self, GatewayError> {
        let transport = HttpTransport::new(DEFAULT_TIMEOUT)?;
        Ok(Self {
            config: Some(config),
            backend: Backend::Http(transport),
        })
    }

    /// Current configuration, if any.
    pub fn config(&self) -> Option<&GatewayConfig> {
        self.config.as_ref()
    }

    /// Merge a partial update into the current configuration.
    ///
    /// A silent no-op when no configuration exists yet.
    pub fn update_config(&mut self, patch: &ConfigPatch) {
        match self.config {
            Some(ref mut config) => config.apply(patch),
            None => warn!("update_config called on unconfigured client; ignoring"),
        }
    }

    /// Drop the configuration entirely. Subsequent requests fail with
    /// "client not configured" until a new one is installed.
    pub fn clear_config(&mut self) {
        self.config = None;
    }

    /// Install a complete configuration, replacing any previous one.
    pub fn set_config(&mut self, config: GatewayConfig) {
        self.config = Some(config);
    }

    /// List federation peers participating in a project.
    pub async fn list_peers(&self, project_id: &str) -> GatewayResponse<Vec<String>> {
        self.request(
            Method::Get,
            format!("/projects/{project_id}/federation/peers"),
            Ok(Value::Null),
        )
        .await
    }

    /// Fetch the aggregate survival summary for a cohort.
    pub async fn aggregate(
        &self,
        project_id: &str,
        cohort: &CohortFilter,
        metrics: &[String],
        horizons: &[u32],
    ) -> GatewayResponse<SurvivalSummary> {
        self.request(
            Method::Post,
            format!("/projects/{project_id}/federation/aggregate"),
            serde_json::to_value(AggregateRequest {
                cohort,
                metrics,
                horizons,
            }),
        )
        .await
    }

    /// Contrast feature statistics between a condition group (e.g.
    /// `failed==1`) and its complement.
    pub async fn complement_stats(
        &self,
        project_id: &str,
        cohort: &CohortFilter,
        condition: &str,
        features: &[String],
    ) -> GatewayResponse<Vec<ComplementStat>> {
        self.request(
            Method::Post,
            format!("/projects/{project_id}/exploration/complement-stats"),
            serde_json::to_value(ComplementStatsRequest {
                cohort,
                condition,
                features,
            }),
        )
        .await
    }

    /// Fetch a feature's binned distribution split by outcome class.
    ///
    /// The requested bin count is forwarded to the gateway; the mock
    /// backend returns its fixed grids regardless.
    pub async fn conditional_tdigest(
        &self,
        project_id: &str,
        feature: &str,
        class_field: &str,
        bins: usize,
    ) -> GatewayResponse<ConditionalDistribution> {
        self.request(
            Method::Post,
            format!("/projects/{project_id}/exploration/conditional-tdigest"),
            serde_json::to_value(ConditionalTDigestRequest {
                feature,
                class_field,
                bins,
            }),
        )
        .await
    }

    /// Train a survival model over a cohort.
    pub async fn train_model(
        &self,
        project_id: &str,
        algorithm: Algorithm,
        label_field: &str,
        censor_field: &str,
        features: &[String],
        cohort: &CohortFilter,
    ) -> GatewayResponse<TrainResult> {
        self.request(
            Method::Post,
            format!("/projects/{project_id}/models/survival/train"),
            serde_json::to_value(TrainRequest {
                algorithm,
                label_field,
                censor_field,
                features,
                cohort,
            }),
        )
        .await
    }

    /// Predict a survival curve for a what-if scenario against a
    /// trained model.
    pub async fn predict(
        &self,
        project_id: &str,
        model_id: &str,
        features: &BTreeMap<String, f64>,
        horizons: &[u32],
    ) -> GatewayResponse<PredictionResult> {
        self.request(
            Method::Post,
            format!("/projects/{project_id}/models/survival/predict"),
            serde_json::to_value(PredictRequest {
                model_id,
                features,
                horizons,
            }),
        )
        .await
    }

    /// Shared request path: configuration guard, envelope construction,
    /// backend dispatch, payload decoding. All faults collapse into an
    /// error-wrapped response.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: Result<Value, serde_json::Error>,
    ) -> GatewayResponse<T> {
        let Some(config) = self.config.as_ref() else {
            return GatewayError::NotConfigured.into();
        };

        let body = match body {
            Ok(body) => body,
            Err(e) => return GatewayError::Serialization(e).into(),
        };

        let envelope = RequestEnvelope { path, method, body };
        debug!(path = %envelope.path, "dispatching gateway request");

        match self.backend.send(config, &envelope).await {
            Ok(payload) => match serde_json::from_value::<T>(payload) {
                Ok(data) => GatewayResponse::ok(data),
                Err(e) => {
                    warn!(path = %envelope.path, error = %e, "payload decode failed");
                    GatewayError::Serialization(e).into()
                }
            },
            Err(e) => {
                debug!(path = %envelope.path, error = %e, "gateway request failed");
                e.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn metrics() -> Vec<String> {
        vec!["survival".to_string(), "hazard".to_string()]
    }

    fn features() -> Vec<String> {
        vec!["weight_on_bit".to_string(), "rotary_speed".to_string()]
    }

    #[tokio::test]
    async fn test_aggregate_returns_paired_curves() {
        init_tracing();
        let client = DemClient::mock();
        let response = client
            .aggregate("p1", &CohortFilter::all(), &metrics(), &[10, 50, 100, 150])
            .await;

        let summary = response.data.expect("aggregate should succeed");
        assert_eq!(summary.survival.times.len(), summary.survival.values.len());
        assert_eq!(summary.hazard.times.len(), summary.hazard.values.len());
        assert!(summary.is_consistent());
        assert_eq!(summary.n_samples, 412);
    }

    #[tokio::test]
    async fn test_aggregate_is_idempotent() {
        let client = DemClient::mock();
        let filter = CohortFilter(json!({ "bit_type": "PDC" }));

        let first = client
            .aggregate("p1", &filter, &metrics(), &[10, 50])
            .await;
        let second = client
            .aggregate("p1", &filter, &metrics(), &[10, 50])
            .await;

        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_predict_horizon_keys_and_range() {
        let client = DemClient::mock();
        let scenario = BTreeMap::from([
            ("weight_on_bit".to_string(), 26.0),
            ("rotary_speed".to_string(), 150.0),
        ]);

        let response = client
            .predict("p1", "model-123", &scenario, &[10, 50, 100, 150])
            .await;

        let prediction = response.data.expect("predict should succeed");
        let mut keys: Vec<&str> = prediction.at_horizon.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["10", "100", "150", "50"]);
        for value in prediction.at_horizon.values() {
            assert!((0.0..=1.0).contains(value));
        }
    }

    #[tokio::test]
    async fn test_complement_stats_delta_sign_convention() {
        let client = DemClient::mock();
        let response = client
            .complement_stats("p1", &CohortFilter::all(), "failed==1", &features())
            .await;

        let stats = response.data.expect("complement stats should succeed");
        assert!(!stats.is_empty());
        for stat in &stats {
            assert_eq!(stat.delta_mean, stat.failed_mean - stat.complement_mean);
        }
    }

    #[tokio::test]
    async fn test_conditional_tdigest_bin_count_is_inert() {
        let client = DemClient::mock();

        let few = client
            .conditional_tdigest("p1", "weight_on_bit", "failed", 3)
            .await;
        let many = client
            .conditional_tdigest("p1", "weight_on_bit", "failed", 64)
            .await;

        // The mock ignores the requested bin count.
        assert_eq!(few.data, many.data);
        let dist = few.data.unwrap();
        assert!(dist.failed.is_consistent());
        assert!(dist.survived.is_consistent());
    }

    #[tokio::test]
    async fn test_train_model_is_not_implemented() {
        let client = DemClient::mock();
        let response = client
            .train_model(
                "p1",
                Algorithm::Weibull,
                "lifetime_hours",
                "censored",
                &features(),
                &CohortFilter::all(),
            )
            .await;

        assert!(response.data.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some("Mock endpoint not implemented")
        );
    }

    #[tokio::test]
    async fn test_list_peers_is_not_implemented_in_mock() {
        let client = DemClient::mock();
        let response = client.list_peers("p1").await;

        assert!(response.data.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some("Mock endpoint not implemented")
        );
    }

    #[tokio::test]
    async fn test_cleared_configuration_refuses_every_operation() {
        let mut client = DemClient::mock();
        client.clear_config();

        let aggregate = client
            .aggregate("p1", &CohortFilter::all(), &metrics(), &[10])
            .await;
        assert!(aggregate.data.is_none());
        assert_eq!(aggregate.error.as_deref(), Some("client not configured"));

        let peers = client.list_peers("p1").await;
        assert!(peers.data.is_none());
        assert!(!peers.error.unwrap().is_empty());

        let predict = client
            .predict("p1", "model-123", &BTreeMap::new(), &[10])
            .await;
        assert!(predict.data.is_none());
        assert_eq!(predict.error.as_deref(), Some("client not configured"));
    }

    #[tokio::test]
    async fn test_update_config_merges_partially() {
        let mut client = DemClient::mock();
        client.set_config(GatewayConfig::new("A", "B"));

        client.update_config(&ConfigPatch {
            region: Some("C".to_string()),
            ..ConfigPatch::default()
        });

        let config = client.config().unwrap();
        assert_eq!(config.base_url, "A");
        assert_eq!(config.region, "C");
    }

    #[tokio::test]
    async fn test_update_config_without_configuration_is_noop() {
        let mut client = DemClient::mock();
        client.clear_config();

        client.update_config(&ConfigPatch {
            region: Some("C".to_string()),
            ..ConfigPatch::default()
        });

        assert!(client.config().is_none());
    }

    #[tokio::test]
    async fn test_operations_run_concurrently() {
        let client = DemClient::mock();
        let filter = CohortFilter::all();
        let scenario = BTreeMap::from([("weight_on_bit".to_string(), 26.0)]);
        let metrics = metrics();
        let features = features();

        let (aggregate, stats, prediction) = tokio::join!(
            client.aggregate("p1", &filter, &metrics, &[10, 50]),
            client.complement_stats("p1", &filter, "failed==1", &features),
            client.predict("p1", "model-123", &scenario, &[10, 50, 100, 150]),
        );

        assert!(aggregate.is_ok());
        assert!(stats.is_ok());
        assert!(prediction.is_ok());
    }

    #[test]
    fn test_client_usable_from_blocking_context() {
        let client = DemClient::mock();
        let response = tokio_test::block_on(client.aggregate(
            "p1",
            &CohortFilter::all(),
            &metrics(),
            &[10],
        ));
        assert!(response.is_ok());
    }
}
