use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{error::ApiError, AppState};

/// Body of a `POST /predict` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// The text to classify
    pub text: String,
}

/// Body of a successful `POST /predict` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// One class id per input text
    pub predictions: Vec<usize>,
}

/// Classify a single text
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let predictor = state.predictor.clone();

    // Featurize and predict are CPU-bound
    let predictions =
        tokio::task::spawn_blocking(move || predictor.predict(&[request.text])).await??;

    Ok(Json(PredictResponse { predictions }))
}

/// Liveness check
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
