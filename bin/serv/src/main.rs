use axum::routing::get;
use np_api::{ApiConfig, ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from NURSEPREP_* environment variables (and .env)
    let config = ApiConfig::from_env()?;

    np_api::tracing::init_tracing(&config.environment);
    let metrics_handle = np_api::metrics::init_metrics()?;

    let addr = config.bind_addr();
    // Opens the database and applies pending migrations
    let state = ApiState::connect(config).await?;

    let app = np_api::router::router()
        .route(
            "/metrics",
            get(move || std::future::ready(metrics_handle.render())),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
