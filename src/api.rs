use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::PredictionError;
use crate::estimator::{BatchPrediction, EmissionEstimator};
use crate::features::RouteInput;

// Shared State for concurrency
#[derive(Clone)]
pub struct AppState {
    pub estimator: EmissionEstimator,
}

pub fn router(state: AppState) -> Router {
    // Allows the browser front end to call the API from another origin
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/health", get(|| async { "OK" }))
        .route("/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// --- API DTOs ---

#[derive(Debug, Deserialize)]
pub struct RoutesRequest {
    pub routes: Vec<RouteInput>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    route_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

// --- Handlers ---

async fn home() -> Json<Value> {
    Json(json!({ "message": "GreenRoute CO2 Prediction API is running" }))
}

async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<RoutesRequest>,
) -> Result<Json<BatchPrediction>, (StatusCode, Json<ErrorBody>)> {
    state
        .estimator
        .derive_and_predict(&payload.routes)
        .map(Json)
        .map_err(error_response)
}

fn error_response(err: PredictionError) -> (StatusCode, Json<ErrorBody>) {
    let (status, route_id, field) = match &err {
        PredictionError::InvalidRoute { route_id, source } => {
            (StatusCode::BAD_REQUEST, Some(*route_id), Some(source.field()))
        }
        PredictionError::EmptyBatch => (StatusCode::BAD_REQUEST, None, None),
        PredictionError::NonFiniteEstimate { route_id } => {
            (StatusCode::INTERNAL_SERVER_ERROR, Some(*route_id), None)
        }
    };
    if status.is_server_error() {
        tracing::error!("prediction failed: {}", err);
    } else {
        tracing::warn!("rejected request: {}", err);
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
            route_id,
            field,
        }),
    )
}
