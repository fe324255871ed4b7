use axum::{
    Json,
    extract::{Path, Query, State},
};
use jiff::Timestamp;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::AppResult,
    models::{
        CinemaType, CountryRuntime, DashboardStats, Director, DirectorScheduleRow, Featurette,
        FeaturetteView, MovieUpdate, MovieView, MutationOutcome, NewMovie, NewShowtime,
        ScheduleRow, Showtime, ShowtimeView, TypeCount, UpcomingRow,
    },
};

pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.catalog.dashboard_stats(Timestamp::now()).await?))
}

pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<MovieView>>> {
    Ok(Json(state.catalog.list_movies().await?))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MovieView>> {
    Ok(Json(state.catalog.get_movie(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieView>>> {
    Ok(Json(state.catalog.search_movies(&query.q).await?))
}

pub async fn create_movie(
    State(state): State<AppState>,
    Json(input): Json<NewMovie>,
) -> Json<MutationOutcome> {
    Json(state.catalog.create_movie(input).await)
}

pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(update): Json<MovieUpdate>,
) -> Json<MutationOutcome> {
    Json(state.catalog.update_movie(id, update).await)
}

#[derive(Debug, Deserialize)]
pub struct SynopsisBody {
    synopsis: String,
}

pub async fn update_synopsis(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<SynopsisBody>,
) -> Json<MutationOutcome> {
    Json(state.catalog.update_synopsis(id, body.synopsis).await)
}

pub async fn movie_showtimes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Showtime>>> {
    Ok(Json(state.catalog.showtimes_for_movie(id).await?))
}

pub async fn movie_featurettes(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Featurette>>> {
    Ok(Json(state.catalog.featurettes_for_movie(id).await?))
}

pub async fn list_showtimes(State(state): State<AppState>) -> AppResult<Json<Vec<ShowtimeView>>> {
    Ok(Json(state.catalog.list_showtimes().await?))
}

pub async fn create_showtime(
    State(state): State<AppState>,
    Json(input): Json<NewShowtime>,
) -> Json<MutationOutcome> {
    Json(state.catalog.create_showtime(input).await)
}

pub async fn list_featurettes(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<FeaturetteView>>> {
    Ok(Json(state.catalog.list_featurettes().await?))
}

pub async fn list_directors(State(state): State<AppState>) -> AppResult<Json<Vec<Director>>> {
    Ok(Json(state.catalog.list_directors().await?))
}

pub async fn list_cinema_types(State(state): State<AppState>) -> AppResult<Json<Vec<CinemaType>>> {
    Ok(Json(state.catalog.list_cinema_types().await?))
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    name: String,
}

pub async fn schedule_by_type(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<Vec<ScheduleRow>>> {
    Ok(Json(state.catalog.schedule_by_type(&query.name).await?))
}

pub async fn movies_by_director(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<Value>> {
    let total = state.catalog.movies_by_director(&query.name).await?;
    Ok(Json(json!({ "total": total })))
}

pub async fn movies_by_cinema_type(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TypeCount>>> {
    Ok(Json(state.catalog.movies_by_cinema_type().await?))
}

pub async fn average_runtime_by_country(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CountryRuntime>>> {
    Ok(Json(state.catalog.average_runtime_by_country().await?))
}

pub async fn upcoming_showtimes(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UpcomingRow>>> {
    Ok(Json(state.catalog.upcoming_showtimes(Timestamp::now()).await?))
}

#[derive(Debug, Deserialize)]
pub struct DirectorsQuery {
    /// Comma-separated list of director names.
    names: String,
}

pub async fn director_schedule(
    State(state): State<AppState>,
    Query(query): Query<DirectorsQuery>,
) -> AppResult<Json<Vec<DirectorScheduleRow>>> {
    let names: Vec<String> =
        query.names.split(',').map(|n| n.trim().to_string()).filter(|n| !n.is_empty()).collect();
    Ok(Json(state.catalog.schedule_for_directors(&names).await?))
}
