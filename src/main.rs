use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use greenroute::api::{self, AppState};
use greenroute::config::AppConfig;
use greenroute::{EmissionEstimator, ModelArtifact};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("greenroute=info,tower_http=info")),
        )
        .init();

    // 1. Configuration
    let config = AppConfig::from_env().context("invalid configuration")?;

    // 2. Load the model once; the service does not start without it
    let model = ModelArtifact::load(&config.model_path).with_context(|| {
        format!("model unavailable at {}", config.model_path.display())
    })?;

    let state = AppState {
        estimator: EmissionEstimator::new(Arc::new(model)),
    };

    // 3. Serve
    let app = api::router(state);
    let addr = config.bind_addr();
    tracing::info!("GreenRoute API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
