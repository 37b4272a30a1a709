use itertools::Itertools;
use serde::Serialize;

use crate::error::PredictionError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// 1-based position of the route in the submitted batch.
    pub route_id: usize,
    pub distance: f64,
    pub predicted_co2: f64,
}

/// Returns the route with the lowest predicted emission. When several routes
/// share the minimum, the one submitted first wins.
pub fn select_greenest(
    results: &[PredictionResult],
) -> Result<&PredictionResult, PredictionError> {
    results
        .iter()
        .position_min_by(|a, b| a.predicted_co2.total_cmp(&b.predicted_co2))
        .map(|idx| &results[idx])
        .ok_or(PredictionError::EmptyBatch)
}
