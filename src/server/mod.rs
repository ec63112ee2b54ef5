use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use log::info;

use crate::pipelines::text_classification::{Pipeline, Predictor};

/// Serving configuration
pub mod config;

/// Error responses
pub mod error;

/// Route handlers
pub mod handlers;

pub use config::{load_config, ServeConfig};
pub use handlers::{PredictRequest, PredictResponse};

/// Shared, read-only state for every request
pub struct AppState {
    /// The fitted model used to answer predictions
    pub predictor: Arc<dyn Predictor>,
}

impl AppState {
    /// Wrap a predictor for sharing across requests
    pub fn new(predictor: Arc<dyn Predictor>) -> Arc<Self> {
        Arc::new(Self { predictor })
    }
}

/// Build the axum [`Router`] with all routes
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
}

/// Produce a ready pipeline: load a saved artifact if configured, otherwise train from CSV
pub fn prepare_pipeline(config: &ServeConfig) -> anyhow::Result<Pipeline> {
    match &config.artifact_dir {
        Some(artifact_dir) => {
            info!("Loading saved pipeline from {}", artifact_dir.display());
            Pipeline::load(artifact_dir)
        }
        None => {
            info!("Training pipeline from {}", config.data_path.display());
            Pipeline::from_csv(&config.data_path, config.training.clone())
        }
    }
}

/// Bind the listen address and serve until the process exits
pub async fn serve(config: &ServeConfig, predictor: Arc<dyn Predictor>) -> anyhow::Result<()> {
    let app = build_router(AppState::new(predictor));

    let listen_addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| anyhow!("Unable to bind {}: {}", listen_addr, e))?;

    info!("Prediction server listening on {}", listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
