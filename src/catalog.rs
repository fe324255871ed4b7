use std::sync::Arc;

use jiff::Timestamp;
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    models::{
        CinemaType, Director, Featurette, FeaturetteView, Movie, MovieUpdate, MovieView,
        MutationOutcome, NewMovie, NewShowtime, Showtime, ShowtimeView,
    },
    store::CatalogStore,
};

const SEARCH_LIMIT: usize = 20;
const SCHEDULE_LIMIT: usize = 50;

/// Catalog operations over a storage backend. All joins and validation
/// happen here so the two backends stay interchangeable.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn CatalogStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    pub async fn list_cinema_types(&self) -> AppResult<Vec<CinemaType>> {
        let mut types = self.store.cinema_types().await?;
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    pub async fn list_directors(&self) -> AppResult<Vec<Director>> {
        let mut directors = self.store.directors().await?;
        directors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(directors)
    }

    pub async fn list_movies(&self) -> AppResult<Vec<MovieView>> {
        let mut movies = self.store.movies().await?;
        movies.sort_by(|a, b| b.release_year.cmp(&a.release_year));
        self.enrich(movies).await
    }

    pub async fn get_movie(&self, id: i32) -> AppResult<MovieView> {
        let movie = self.store.movie(id).await?.ok_or(AppError::NotFound("movie"))?;
        let mut views = self.enrich(vec![movie]).await?;
        Ok(views.remove(0))
    }

    /// Case-insensitive substring match over original and localized titles,
    /// in natural collection order, capped at the first 20 hits.
    pub async fn search_movies(&self, term: &str) -> AppResult<Vec<MovieView>> {
        let needle = term.to_lowercase();
        let movies = self
            .store
            .movies()
            .await?
            .into_iter()
            .filter(|m| {
                m.original_title.to_lowercase().contains(&needle)
                    || m.localized_title
                        .as_ref()
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .take(SEARCH_LIMIT)
            .collect();
        self.enrich(movies).await
    }

    pub async fn showtimes_for_movie(&self, movie_id: i32) -> AppResult<Vec<Showtime>> {
        let mut showtimes: Vec<_> = self
            .store
            .showtimes()
            .await?
            .into_iter()
            .filter(|s| s.movie_id == movie_id)
            .collect();
        showtimes.sort_by_key(|s| s.starts_at);
        Ok(showtimes)
    }

    pub async fn featurettes_for_movie(&self, movie_id: i32) -> AppResult<Vec<Featurette>> {
        let mut featurettes: Vec<_> = self
            .store
            .featurettes()
            .await?
            .into_iter()
            .filter(|f| f.movie_id == Some(movie_id))
            .collect();
        featurettes.sort_by_key(|f| f.aired_at.unwrap_or(Timestamp::UNIX_EPOCH));
        Ok(featurettes)
    }

    /// Full schedule joined to movie titles, newest first, capped at 50.
    /// Showtimes whose movie is missing are dropped.
    pub async fn list_showtimes(&self) -> AppResult<Vec<ShowtimeView>> {
        let movies = self.store.movies().await?;
        let mut views: Vec<_> = self
            .store
            .showtimes()
            .await?
            .into_iter()
            .filter_map(|s| {
                let movie = movies.iter().find(|m| m.id == s.movie_id)?;
                Some(ShowtimeView {
                    original_title: movie.original_title.clone(),
                    localized_title: movie.localized_title.clone(),
                    runtime_minutes: movie.runtime_minutes,
                    showtime: s,
                })
            })
            .collect();
        views.sort_by_key(|v| std::cmp::Reverse(v.showtime.starts_at));
        views.truncate(SCHEDULE_LIMIT);
        Ok(views)
    }

    pub async fn list_featurettes(&self) -> AppResult<Vec<FeaturetteView>> {
        let movies = self.store.movies().await?;
        let mut views: Vec<_> = self
            .store
            .featurettes()
            .await?
            .into_iter()
            .map(|f| {
                let movie_title = f
                    .movie_id
                    .and_then(|id| movies.iter().find(|m| m.id == id))
                    .map(|m| m.original_title.clone());
                FeaturetteView { featurette: f, movie_title }
            })
            .collect();
        views.sort_by_key(|v| {
            std::cmp::Reverse(v.featurette.aired_at.unwrap_or(Timestamp::UNIX_EPOCH))
        });
        Ok(views)
    }

    /// The original schema clamped this in a BEFORE INSERT trigger; here it
    /// is plain application logic applied on every create path.
    pub async fn create_movie(&self, mut input: NewMovie) -> MutationOutcome {
        input.runtime_minutes = Some(clamp_runtime(input.runtime_minutes));
        match self.store.insert_movie(input).await {
            Ok(id) => {
                info!(movie_id = id, "movie created");
                MutationOutcome::created(id, "movie created")
            }
            Err(err) => {
                warn!(error = %err, "movie creation failed");
                MutationOutcome::failed(err.to_string())
            }
        }
    }

    /// The referenced movie is not validated; orphan showtimes are tolerated
    /// in storage and filtered out by every read-side join.
    pub async fn create_showtime(&self, input: NewShowtime) -> MutationOutcome {
        let movie_id = input.movie_id;
        match self.store.insert_showtime(input).await {
            Ok(id) => {
                info!(showtime_id = id, movie_id, "showtime scheduled");
                MutationOutcome::created(id, "showtime created")
            }
            Err(err) => {
                warn!(error = %err, movie_id, "showtime creation failed");
                MutationOutcome::failed(err.to_string())
            }
        }
    }

    pub async fn update_movie(&self, id: i32, update: MovieUpdate) -> MutationOutcome {
        if update.is_empty() {
            return MutationOutcome::failed("no fields to update");
        }
        match self.store.update_movie(id, update).await {
            Ok(()) => {
                info!(movie_id = id, "movie updated");
                MutationOutcome::applied("movie updated")
            }
            Err(err) => MutationOutcome::failed(err.to_string()),
        }
    }

    /// Synopsis-only entry point, kept separate to mirror the original's
    /// stored-procedure code path. Empty text is allowed.
    pub async fn update_synopsis(&self, id: i32, text: String) -> MutationOutcome {
        match self.store.update_movie(id, MovieUpdate::synopsis_only(text)).await {
            Ok(()) => {
                info!(movie_id = id, "synopsis updated");
                MutationOutcome::applied(format!("synopsis of movie {id} updated"))
            }
            Err(err) => MutationOutcome::failed(err.to_string()),
        }
    }

    async fn enrich(&self, movies: Vec<Movie>) -> AppResult<Vec<MovieView>> {
        let directors = self.store.directors().await?;
        let types = self.store.cinema_types().await?;
        Ok(movies
            .into_iter()
            .map(|m| {
                let director_name = m
                    .director_id
                    .and_then(|id| directors.iter().find(|d| d.id == id))
                    .map(|d| d.name.clone());
                let cinema_type_name = m
                    .cinema_type_id
                    .and_then(|id| types.iter().find(|t| t.id == id))
                    .map(|t| t.name.clone());
                MovieView { movie: m, director_name, cinema_type_name }
            })
            .collect())
    }
}

fn clamp_runtime(minutes: Option<i32>) -> i32 {
    match minutes {
        Some(m) if m > 0 => m,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn catalog() -> Catalog {
        Catalog::new(Arc::new(MemoryStore::new()))
    }

    fn movie(title: &str, runtime: Option<i32>) -> NewMovie {
        NewMovie {
            original_title: title.to_string(),
            localized_title: None,
            synopsis: None,
            release_year: 2001,
            country: None,
            runtime_minutes: runtime,
            tech_sheet: None,
            director_id: None,
            cinema_type_id: None,
        }
    }

    #[tokio::test]
    async fn create_clamps_missing_or_invalid_runtime_to_one() {
        let catalog = catalog();
        for runtime in [None, Some(0), Some(-5)] {
            let outcome = catalog.create_movie(movie("x", runtime)).await;
            assert!(outcome.success);
            let stored = catalog.get_movie(outcome.id.unwrap()).await.unwrap();
            assert_eq!(stored.movie.runtime_minutes, Some(1));
        }
    }

    #[tokio::test]
    async fn create_keeps_valid_runtime_exactly() {
        let catalog = catalog();
        let outcome = catalog.create_movie(movie("x", Some(135))).await;
        let stored = catalog.get_movie(outcome.id.unwrap()).await.unwrap();
        assert_eq!(stored.movie.runtime_minutes, Some(135));
    }

    #[tokio::test]
    async fn create_then_get_round_trips_all_fields() {
        let catalog = catalog();
        let director_id = catalog.store().insert_director("Alfonso Cuarón".into()).await.unwrap();
        let type_id = catalog.store().insert_cinema_type("Cine de autor".into()).await.unwrap();

        let input = NewMovie {
            original_title: "Roma".to_string(),
            localized_title: Some("Roma".to_string()),
            synopsis: Some("Una empleada doméstica en los setenta.".to_string()),
            release_year: 2018,
            country: Some("México".to_string()),
            runtime_minutes: Some(135),
            tech_sheet: Some("B/N, 65 mm".to_string()),
            director_id: Some(director_id),
            cinema_type_id: Some(type_id),
        };
        let outcome = catalog.create_movie(input.clone()).await;
        assert!(outcome.success);

        let view = catalog.get_movie(outcome.id.unwrap()).await.unwrap();
        assert_eq!(view.movie.original_title, input.original_title);
        assert_eq!(view.movie.synopsis, input.synopsis);
        assert_eq!(view.movie.release_year, input.release_year);
        assert_eq!(view.movie.country, input.country);
        assert_eq!(view.movie.tech_sheet, input.tech_sheet);
        assert_eq!(view.director_name.as_deref(), Some("Alfonso Cuarón"));
        assert_eq!(view.cinema_type_name.as_deref(), Some("Cine de autor"));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_both_titles() {
        let catalog = catalog();
        let mut input = movie("The Godfather", Some(175));
        input.localized_title = Some("El Padrino".to_string());
        catalog.create_movie(input).await;
        catalog.create_movie(movie("Taxi Driver", Some(114))).await;

        let lower = catalog.search_movies("godfather").await.unwrap();
        let upper = catalog.search_movies("GODFATHER").await.unwrap();
        assert_eq!(lower.len(), 1);
        assert_eq!(
            lower.iter().map(|v| v.movie.id).collect::<Vec<_>>(),
            upper.iter().map(|v| v.movie.id).collect::<Vec<_>>()
        );

        let localized = catalog.search_movies("padrino").await.unwrap();
        assert_eq!(localized.len(), 1);
        assert_eq!(localized[0].movie.original_title, "The Godfather");
    }

    #[tokio::test]
    async fn search_caps_results_at_twenty() {
        let catalog = catalog();
        for i in 0..25 {
            catalog.create_movie(movie(&format!("Sequel {i}"), Some(90))).await;
        }
        assert_eq!(catalog.search_movies("sequel").await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn update_missing_movie_reports_not_found() {
        let catalog = catalog();
        let update = MovieUpdate { release_year: Some(1999), ..MovieUpdate::default() };
        let outcome = catalog.update_movie(999, update).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "movie not found");
    }

    #[tokio::test]
    async fn empty_update_is_rejected_without_touching_the_store() {
        let catalog = catalog();
        let outcome = catalog.update_movie(1, MovieUpdate::default()).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "no fields to update");
    }

    #[tokio::test]
    async fn synopsis_procedure_updates_only_the_synopsis() {
        let catalog = catalog();
        let id = catalog.create_movie(movie("Cronos", Some(94))).await.id.unwrap();

        let outcome = catalog.update_synopsis(id, "Un anticuario y un escarabajo.".into()).await;
        assert!(outcome.success);

        let view = catalog.get_movie(id).await.unwrap();
        assert_eq!(view.movie.synopsis.as_deref(), Some("Un anticuario y un escarabajo."));
        assert_eq!(view.movie.original_title, "Cronos");
        assert_eq!(view.movie.runtime_minutes, Some(94));

        // empty string is allowed, not treated as "clear"
        assert!(catalog.update_synopsis(id, String::new()).await.success);
        let view = catalog.get_movie(id).await.unwrap();
        assert_eq!(view.movie.synopsis.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn showtimes_for_movie_are_ascending_and_scoped() {
        let catalog = catalog();
        let id = catalog.create_movie(movie("Los Olvidados", Some(85))).await.id.unwrap();
        let other = catalog.create_movie(movie("Él", Some(93))).await.id.unwrap();

        for ts in ["2026-09-03T20:00:00Z", "2026-09-01T20:00:00Z", "2026-09-02T18:30:00Z"] {
            let starts_at = ts.parse().unwrap();
            catalog.create_showtime(NewShowtime { starts_at, movie_id: id }).await;
        }
        catalog
            .create_showtime(NewShowtime {
                starts_at: "2026-09-01T12:00:00Z".parse().unwrap(),
                movie_id: other,
            })
            .await;

        let showtimes = catalog.showtimes_for_movie(id).await.unwrap();
        assert_eq!(showtimes.len(), 3);
        assert!(showtimes.windows(2).all(|w| w[0].starts_at <= w[1].starts_at));
        assert!(showtimes.iter().all(|s| s.movie_id == id));
    }

    #[tokio::test]
    async fn featurettes_for_movie_sort_ascending_with_undated_first() {
        let catalog = catalog();
        let id = catalog.create_movie(movie("Roma", Some(135))).await.id.unwrap();

        for (title, aired) in [
            ("B", Some("2026-09-02T12:00:00Z")),
            ("A", Some("2026-09-01T12:00:00Z")),
            ("Sin fecha", None),
        ] {
            let aired_at = aired.map(|ts| ts.parse().unwrap());
            catalog
                .store()
                .insert_featurette(crate::models::NewFeaturette {
                    title: title.to_string(),
                    description: None,
                    runtime_minutes: None,
                    aired_at,
                    movie_id: Some(id),
                })
                .await
                .unwrap();
        }

        let featurettes = catalog.featurettes_for_movie(id).await.unwrap();
        let titles: Vec<_> = featurettes.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["Sin fecha", "A", "B"]);
    }

    #[tokio::test]
    async fn orphan_showtime_is_stored_but_filtered_from_joined_schedule() {
        let catalog = catalog();
        let outcome = catalog
            .create_showtime(NewShowtime {
                starts_at: "2026-09-01T20:00:00Z".parse().unwrap(),
                movie_id: 404,
            })
            .await;
        assert!(outcome.success);

        assert_eq!(catalog.store().showtimes().await.unwrap().len(), 1);
        assert!(catalog.list_showtimes().await.unwrap().is_empty());
    }
}
