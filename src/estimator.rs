use serde::Serialize;
use std::sync::Arc;

use crate::error::PredictionError;
use crate::features::{RouteInput, RouteObservation, derive_features, round2};
use crate::model::EmissionModel;
use crate::selector::{PredictionResult, select_greenest};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPrediction {
    pub all_routes: Vec<PredictionResult>,
    pub recommended_green_route: PredictionResult,
}

/// Runs a batch of candidate routes through the loaded model. Holds only
/// read-only state, so one instance serves every request concurrently.
#[derive(Clone)]
pub struct EmissionEstimator {
    model: Arc<dyn EmissionModel>,
}

impl EmissionEstimator {
    pub fn new(model: Arc<dyn EmissionModel>) -> Self {
        Self { model }
    }

    /// Each batch is atomic: one invalid route rejects the whole request
    /// before the model sees anything.
    pub fn derive_and_predict(
        &self,
        routes: &[RouteInput],
    ) -> Result<BatchPrediction, PredictionError> {
        if routes.is_empty() {
            return Err(PredictionError::EmptyBatch);
        }

        let observations = routes
            .iter()
            .enumerate()
            .map(|(idx, input)| {
                RouteObservation::try_from(input).map_err(|source| PredictionError::InvalidRoute {
                    route_id: idx + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut all_routes = Vec::with_capacity(observations.len());
        for (idx, route) in observations.iter().enumerate() {
            let route_id = idx + 1;
            let features = derive_features(route);
            let co2 = self.model.predict(&features);
            if !co2.is_finite() {
                return Err(PredictionError::NonFiniteEstimate { route_id });
            }
            tracing::debug!(route_id, ?features, co2, "predicted route emission");

            all_routes.push(PredictionResult {
                route_id,
                distance: route.distance(),
                predicted_co2: round2(co2),
            });
        }

        let recommended_green_route = select_greenest(&all_routes)?.clone();
        tracing::info!(
            routes = all_routes.len(),
            recommended = recommended_green_route.route_id,
            co2 = recommended_green_route.predicted_co2,
            "selected greenest route"
        );

        Ok(BatchPrediction {
            all_routes,
            recommended_green_route,
        })
    }
}
