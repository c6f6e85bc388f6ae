mod auth;
mod config;
mod middleware;

mod db;
mod error;
mod models;
mod routes;
mod services;
mod store;
mod web;

use std::sync::Arc;

use crate::{
    config::Config,
    middleware::api_token::TOKEN_HEADER,
    models::AppState,
    store::{MemoryStore, PgStore},
};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;

    let state = match cfg.database_url.as_deref() {
        Some(url) => {
            let pool = db::connect_pg(url, cfg.db_max_connections).await?;
            tracing::info!(max_connections = cfg.db_max_connections, "using postgres store");
            AppState::from_store(Arc::new(PgStore::new(pool)), &cfg.api_token)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; data lives in memory and is lost on exit");
            AppState::from_store(Arc::new(MemoryStore::default()), &cfg.api_token)
        }
    };
    tracing::info!(
        token_fingerprint = %auth::token_fingerprint(&cfg.api_token),
        "shared-secret gate enabled"
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, TOKEN_HEADER.clone()]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
