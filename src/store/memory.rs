use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        CinemaType, Director, Featurette, Movie, MovieUpdate, NewFeaturette, NewMovie, NewShowtime,
        Showtime,
    },
    store::CatalogStore,
};

#[derive(Default)]
struct Collections {
    cinema_types: Vec<CinemaType>,
    directors: Vec<Director>,
    movies: Vec<Movie>,
    showtimes: Vec<Showtime>,
    featurettes: Vec<Featurette>,
}

/// In-memory backend. Each mutation takes the write lock for one
/// read-modify-write step and never holds it across another store call.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> i32) -> i32 {
    items.iter().map(id_of).max().unwrap_or(0) + 1
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn cinema_types(&self) -> AppResult<Vec<CinemaType>> {
        Ok(self.inner.read().await.cinema_types.clone())
    }

    async fn directors(&self) -> AppResult<Vec<Director>> {
        Ok(self.inner.read().await.directors.clone())
    }

    async fn movies(&self) -> AppResult<Vec<Movie>> {
        Ok(self.inner.read().await.movies.clone())
    }

    async fn movie(&self, id: i32) -> AppResult<Option<Movie>> {
        Ok(self.inner.read().await.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn showtimes(&self) -> AppResult<Vec<Showtime>> {
        Ok(self.inner.read().await.showtimes.clone())
    }

    async fn featurettes(&self) -> AppResult<Vec<Featurette>> {
        Ok(self.inner.read().await.featurettes.clone())
    }

    async fn insert_cinema_type(&self, name: String) -> AppResult<i32> {
        let mut inner = self.inner.write().await;
        let id = next_id(&inner.cinema_types, |t| t.id);
        inner.cinema_types.push(CinemaType { id, name });
        Ok(id)
    }

    async fn insert_director(&self, name: String) -> AppResult<i32> {
        let mut inner = self.inner.write().await;
        let id = next_id(&inner.directors, |d| d.id);
        inner.directors.push(Director { id, name });
        Ok(id)
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<i32> {
        let mut inner = self.inner.write().await;
        let id = next_id(&inner.movies, |m| m.id);
        inner.movies.push(Movie {
            id,
            original_title: movie.original_title,
            localized_title: movie.localized_title,
            synopsis: movie.synopsis,
            release_year: movie.release_year,
            country: movie.country,
            runtime_minutes: movie.runtime_minutes,
            tech_sheet: movie.tech_sheet,
            director_id: movie.director_id,
            cinema_type_id: movie.cinema_type_id,
        });
        Ok(id)
    }

    async fn insert_showtime(&self, showtime: NewShowtime) -> AppResult<i32> {
        let mut inner = self.inner.write().await;
        let id = next_id(&inner.showtimes, |s| s.id);
        inner.showtimes.push(Showtime {
            id,
            starts_at: showtime.starts_at,
            movie_id: showtime.movie_id,
        });
        Ok(id)
    }

    async fn insert_featurette(&self, featurette: NewFeaturette) -> AppResult<i32> {
        let mut inner = self.inner.write().await;
        let id = next_id(&inner.featurettes, |f| f.id);
        inner.featurettes.push(Featurette {
            id,
            title: featurette.title,
            description: featurette.description,
            runtime_minutes: featurette.runtime_minutes,
            aired_at: featurette.aired_at,
            movie_id: featurette.movie_id,
        });
        Ok(id)
    }

    async fn update_movie(&self, id: i32, update: MovieUpdate) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let movie = inner
            .movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AppError::NotFound("movie"))?;
        update.apply(movie);
        Ok(())
    }
}
