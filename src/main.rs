mod config;
mod db;
mod error;
mod handlers;
mod listing;
mod models;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::CONFIG;
use crate::handlers::AppState;

async fn health() -> &'static str {
    "Pengiriman server is running."
}

/// Build the application router: login is public, everything else sits
/// behind the bearer-token gate.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/pengiriman",
            get(handlers::shipment::list_shipments_query).post(handlers::shipment::list_shipments),
        )
        .route(
            "/api/infinite-scroll",
            post(handlers::shipment::list_shipments),
        )
        .route("/api/kirim-barang", post(handlers::shipment::create_shipment))
        .route(
            "/api/pengiriman/{id}",
            get(handlers::shipment::get_shipment)
                .put(handlers::shipment::update_shipment)
                .delete(handlers::shipment::delete_shipment),
        )
        .route(
            "/api/katalog",
            get(handlers::catalog::list_catalog).post(handlers::catalog::create_catalog_item),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::auth::require_auth,
        ));

    Router::new()
        .route("/", get(health))
        .route("/api/login", post(handlers::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let pool = db::init_db_pool(&CONFIG.database_url).await?;
    let state = AppState::new(
        pool,
        CONFIG.jwt_secret.clone(),
        CONFIG.jwt_expiration_hours,
    );

    let listener = tokio::net::TcpListener::bind(CONFIG.server_addr()).await?;
    tracing::info!("Listening on {}", CONFIG.server_addr());

    axum::serve(listener, router(state)).await?;

    Ok(())
}
