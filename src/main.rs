mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod queries;
mod routes;
mod seed;
mod store;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    catalog::Catalog,
    config::{Config, StoreBackend},
    store::{CatalogStore, MemoryStore, SqlStore},
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,cartelera=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn CatalogStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::Sqlite => {
            let db = db::connect_and_migrate(&config.database_url).await?;
            Arc::new(SqlStore::new(db))
        }
    };

    seed::seed_if_empty(store.as_ref()).await?;

    let state = AppState { catalog: Catalog::new(store) };

    let app = Router::new()
        .route("/api/dashboard", get(routes::dashboard))
        .route("/api/movies", get(routes::list_movies).post(routes::create_movie))
        .route("/api/movies/search", get(routes::search_movies))
        .route("/api/movies/{id}", get(routes::get_movie).patch(routes::update_movie))
        .route("/api/movies/{id}/synopsis", put(routes::update_synopsis))
        .route("/api/movies/{id}/showtimes", get(routes::movie_showtimes))
        .route("/api/movies/{id}/featurettes", get(routes::movie_featurettes))
        .route("/api/showtimes", get(routes::list_showtimes).post(routes::create_showtime))
        .route("/api/featurettes", get(routes::list_featurettes))
        .route("/api/directors", get(routes::list_directors))
        .route("/api/cinema-types", get(routes::list_cinema_types))
        .route("/api/queries/schedule-by-type", get(routes::schedule_by_type))
        .route("/api/queries/movies-by-director", get(routes::movies_by_director))
        .route("/api/queries/movies-by-cinema-type", get(routes::movies_by_cinema_type))
        .route(
            "/api/queries/average-runtime-by-country",
            get(routes::average_runtime_by_country),
        )
        .route("/api/queries/upcoming-showtimes", get(routes::upcoming_showtimes))
        .route("/api/queries/director-schedule", get(routes::director_schedule))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, backend = ?config.backend, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
