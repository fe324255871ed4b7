mod memory;
mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        CinemaType, Director, Featurette, Movie, MovieUpdate, NewFeaturette, NewMovie, NewShowtime,
        Showtime,
    },
};

/// Storage primitives shared by both backends. Joins, aggregations and
/// validation all live above this trait so they are written exactly once.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn cinema_types(&self) -> AppResult<Vec<CinemaType>>;
    async fn directors(&self) -> AppResult<Vec<Director>>;
    async fn movies(&self) -> AppResult<Vec<Movie>>;
    async fn movie(&self, id: i32) -> AppResult<Option<Movie>>;
    async fn showtimes(&self) -> AppResult<Vec<Showtime>>;
    async fn featurettes(&self) -> AppResult<Vec<Featurette>>;

    /// Assigns the next unused id and returns it. Ids are never reused.
    async fn insert_cinema_type(&self, name: String) -> AppResult<i32>;
    async fn insert_director(&self, name: String) -> AppResult<i32>;
    async fn insert_movie(&self, movie: NewMovie) -> AppResult<i32>;
    async fn insert_showtime(&self, showtime: NewShowtime) -> AppResult<i32>;
    async fn insert_featurette(&self, featurette: NewFeaturette) -> AppResult<i32>;

    /// Fails NotFound when the id is absent; otherwise shallow-merges the
    /// supplied fields into the stored record.
    async fn update_movie(&self, id: i32, update: MovieUpdate) -> AppResult<()>;
}
