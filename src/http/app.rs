use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::database::Database;
use crate::http::routes;
use crate::http::state::AppState;

/// Assemble the full router. Split out from `start` so tests can mount
/// it on an ephemeral port.
pub fn build_router(db: Arc<Database>) -> Router {
    let state = Arc::new(AppState::new(db));

    Router::new()
        .nest("/films", routes::films::router())
        .nest("/actors", routes::actors::router())
        .route("/healthcheck", get(routes::healthcheck))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start(config: &Config, db: Arc<Database>) -> color_eyre::Result<()> {
    let app = build_router(db);

    let listener = tokio::net::TcpListener::bind(&config.http.address)
        .await
        .wrap_err_with(|| eyre!("Failed to bind to {}", config.http.address))?;
    tracing::info!(address = %config.http.address, "HTTP server listening");
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
