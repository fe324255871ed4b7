use std::collections::BTreeMap;

use jiff::Timestamp;

use crate::{
    catalog::Catalog,
    error::AppResult,
    models::{
        CountryRuntime, DashboardStats, DirectorScheduleRow, NextShowtime, ScheduleRow, TypeCount,
        UpcomingRow,
    },
};

const UPCOMING_LIMIT: usize = 10;

impl Catalog {
    /// Schedule for one cinema type: its movies joined to showtimes and
    /// directors, ascending by showtime. Unknown type names yield no rows.
    pub async fn schedule_by_type(&self, type_name: &str) -> AppResult<Vec<ScheduleRow>> {
        let types = self.store().cinema_types().await?;
        let Some(cinema_type) = types.iter().find(|t| t.name == type_name) else {
            return Ok(Vec::new());
        };

        let movies: Vec<_> = self
            .store()
            .movies()
            .await?
            .into_iter()
            .filter(|m| m.cinema_type_id == Some(cinema_type.id))
            .collect();
        let directors = self.store().directors().await?;

        let mut rows: Vec<_> = self
            .store()
            .showtimes()
            .await?
            .into_iter()
            .filter_map(|s| {
                let movie = movies.iter().find(|m| m.id == s.movie_id)?;
                let director = movie
                    .director_id
                    .and_then(|id| directors.iter().find(|d| d.id == id))
                    .map(|d| d.name.clone());
                Some(ScheduleRow {
                    cinema_type: cinema_type.name.clone(),
                    title: movie.display_title().to_string(),
                    director,
                    starts_at: s.starts_at,
                })
            })
            .collect();
        rows.sort_by_key(|r| r.starts_at);
        Ok(rows)
    }

    /// Exact-name movie count; an unknown director is 0, not an error.
    pub async fn movies_by_director(&self, director_name: &str) -> AppResult<usize> {
        let directors = self.store().directors().await?;
        let Some(director) = directors.iter().find(|d| d.name == director_name) else {
            return Ok(0);
        };
        let movies = self.store().movies().await?;
        Ok(movies.iter().filter(|m| m.director_id == Some(director.id)).count())
    }

    /// Movie count per cinema type, zero-movie types included, descending
    /// by count.
    pub async fn movies_by_cinema_type(&self) -> AppResult<Vec<TypeCount>> {
        let types = self.store().cinema_types().await?;
        let movies = self.store().movies().await?;

        let mut rows: Vec<_> = types
            .into_iter()
            .map(|t| {
                let total = movies.iter().filter(|m| m.cinema_type_id == Some(t.id)).count();
                TypeCount { cinema_type: t.name, total }
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        Ok(rows)
    }

    /// Mean runtime per origin country. Movies with no country or no runtime
    /// never join a group; groups below two movies are dropped (the HAVING
    /// clause of the original query). Descending by average.
    pub async fn average_runtime_by_country(&self) -> AppResult<Vec<CountryRuntime>> {
        let movies = self.store().movies().await?;

        let mut groups: BTreeMap<String, (i64, usize)> = BTreeMap::new();
        for movie in &movies {
            let (Some(country), Some(runtime)) = (&movie.country, movie.runtime_minutes) else {
                continue;
            };
            let entry = groups.entry(country.clone()).or_default();
            entry.0 += i64::from(runtime);
            entry.1 += 1;
        }

        let mut rows: Vec<_> = groups
            .into_iter()
            .filter(|(_, (_, count))| *count >= 2)
            .map(|(country, (total, count))| CountryRuntime {
                country,
                average_minutes: total as f64 / count as f64,
                movie_count: count,
            })
            .collect();
        rows.sort_by(|a, b| b.average_minutes.total_cmp(&a.average_minutes));
        Ok(rows)
    }

    /// Showtimes at or after `now`, fully joined, ascending, first 10.
    pub async fn upcoming_showtimes(&self, now: Timestamp) -> AppResult<Vec<UpcomingRow>> {
        let movies = self.store().movies().await?;
        let directors = self.store().directors().await?;
        let types = self.store().cinema_types().await?;

        let mut rows: Vec<_> = self
            .store()
            .showtimes()
            .await?
            .into_iter()
            .filter(|s| s.starts_at >= now)
            .filter_map(|s| {
                let movie = movies.iter().find(|m| m.id == s.movie_id)?;
                let director = movie
                    .director_id
                    .and_then(|id| directors.iter().find(|d| d.id == id))
                    .map(|d| d.name.clone());
                let cinema_type = movie
                    .cinema_type_id
                    .and_then(|id| types.iter().find(|t| t.id == id))
                    .map(|t| t.name.clone());
                Some(UpcomingRow {
                    starts_at: s.starts_at,
                    title: movie.display_title().to_string(),
                    director,
                    cinema_type,
                })
            })
            .collect();
        rows.sort_by_key(|r| r.starts_at);
        rows.truncate(UPCOMING_LIMIT);
        Ok(rows)
    }

    /// Showtimes of movies directed by any of the given names, sorted by
    /// director name then showtime.
    pub async fn schedule_for_directors(
        &self,
        names: &[String],
    ) -> AppResult<Vec<DirectorScheduleRow>> {
        let directors = self.store().directors().await?;
        let selected: Vec<_> =
            directors.into_iter().filter(|d| names.contains(&d.name)).collect();

        let movies: Vec<_> = self
            .store()
            .movies()
            .await?
            .into_iter()
            .filter(|m| {
                m.director_id.is_some_and(|id| selected.iter().any(|d| d.id == id))
            })
            .collect();

        let mut rows: Vec<_> = self
            .store()
            .showtimes()
            .await?
            .into_iter()
            .filter_map(|s| {
                let movie = movies.iter().find(|m| m.id == s.movie_id)?;
                let director = selected.iter().find(|d| Some(d.id) == movie.director_id)?;
                Some(DirectorScheduleRow {
                    starts_at: s.starts_at,
                    title: movie.display_title().to_string(),
                    director: director.name.clone(),
                    runtime_minutes: movie.runtime_minutes.unwrap_or(0),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.director.cmp(&b.director).then(a.starts_at.cmp(&b.starts_at)));
        Ok(rows)
    }

    /// Collection totals plus the soonest showtime strictly after `now`,
    /// carrying the movie's original title. Absent when nothing is upcoming.
    pub async fn dashboard_stats(&self, now: Timestamp) -> AppResult<DashboardStats> {
        let movies = self.store().movies().await?;
        let showtimes = self.store().showtimes().await?;
        let featurettes = self.store().featurettes().await?;
        let directors = self.store().directors().await?;

        let next_showtime = showtimes
            .iter()
            .filter(|s| s.starts_at > now)
            .filter_map(|s| {
                let movie = movies.iter().find(|m| m.id == s.movie_id)?;
                Some(NextShowtime {
                    id: s.id,
                    starts_at: s.starts_at,
                    movie_id: s.movie_id,
                    original_title: movie.original_title.clone(),
                })
            })
            .min_by_key(|n| n.starts_at);

        Ok(DashboardStats {
            movies: movies.len(),
            showtimes: showtimes.len(),
            featurettes: featurettes.len(),
            directors: directors.len(),
            next_showtime,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        models::{NewFeaturette, NewMovie, NewShowtime},
        store::{CatalogStore, MemoryStore},
    };

    struct Fixture {
        catalog: Catalog,
    }

    impl Fixture {
        fn new() -> Self {
            Self { catalog: Catalog::new(Arc::new(MemoryStore::new())) }
        }

        fn store(&self) -> &Arc<dyn CatalogStore> {
            self.catalog.store()
        }

        async fn director(&self, name: &str) -> i32 {
            self.store().insert_director(name.to_string()).await.unwrap()
        }

        async fn cinema_type(&self, name: &str) -> i32 {
            self.store().insert_cinema_type(name.to_string()).await.unwrap()
        }

        async fn movie(
            &self,
            title: &str,
            country: Option<&str>,
            runtime: Option<i32>,
            director_id: Option<i32>,
            cinema_type_id: Option<i32>,
        ) -> i32 {
            self.store()
                .insert_movie(NewMovie {
                    original_title: title.to_string(),
                    localized_title: None,
                    synopsis: None,
                    release_year: 2000,
                    country: country.map(str::to_string),
                    runtime_minutes: runtime,
                    tech_sheet: None,
                    director_id,
                    cinema_type_id,
                })
                .await
                .unwrap()
        }

        async fn showtime(&self, movie_id: i32, ts: &str) -> i32 {
            self.store()
                .insert_showtime(NewShowtime { starts_at: ts.parse().unwrap(), movie_id })
                .await
                .unwrap()
        }
    }

    fn at(ts: &str) -> Timestamp {
        ts.parse().unwrap()
    }

    #[tokio::test]
    async fn average_runtime_groups_only_countries_with_two_or_more() {
        let fx = Fixture::new();
        fx.movie("Roma", Some("México"), Some(135), None, None).await;
        fx.movie("Amores Perros", Some("México"), Some(154), None, None).await;
        fx.movie("La Ciénaga", Some("Argentina"), Some(103), None, None).await;
        // excluded from any group
        fx.movie("Sin País", None, Some(120), None, None).await;
        fx.movie("Sin Duración", Some("México"), None, None, None).await;

        let rows = fx.catalog.average_runtime_by_country().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "México");
        assert_eq!(rows[0].average_minutes, 144.5);
        assert_eq!(rows[0].movie_count, 2);
        assert!(rows.iter().all(|r| r.movie_count >= 2));
    }

    #[tokio::test]
    async fn average_runtime_sorts_descending_by_average() {
        let fx = Fixture::new();
        for (title, country, runtime) in [
            ("a", "Francia", 90),
            ("b", "Francia", 100),
            ("c", "Japón", 150),
            ("d", "Japón", 160),
        ] {
            fx.movie(title, Some(country), Some(runtime), None, None).await;
        }

        let rows = fx.catalog.average_runtime_by_country().await.unwrap();
        assert_eq!(rows[0].country, "Japón");
        assert_eq!(rows[1].country, "Francia");
    }

    #[tokio::test]
    async fn upcoming_is_capped_at_ten_and_never_in_the_past() {
        let fx = Fixture::new();
        let id = fx.movie("Roma", None, Some(135), None, None).await;
        fx.showtime(id, "2026-08-01T20:00:00Z").await;
        for day in 1..=14 {
            fx.showtime(id, &format!("2026-09-{day:02}T20:00:00Z")).await;
        }

        let now = at("2026-08-28T00:00:00Z");
        let rows = fx.catalog.upcoming_showtimes(now).await.unwrap();
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.starts_at >= now));
        assert!(rows.windows(2).all(|w| w[0].starts_at <= w[1].starts_at));
    }

    #[tokio::test]
    async fn upcoming_includes_showtimes_starting_exactly_now() {
        let fx = Fixture::new();
        let id = fx.movie("Roma", None, Some(135), None, None).await;
        fx.showtime(id, "2026-08-28T00:00:00Z").await;

        let rows = fx.catalog.upcoming_showtimes(at("2026-08-28T00:00:00Z")).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn schedule_by_type_joins_and_sorts_ascending() {
        let fx = Fixture::new();
        let auteur = fx.cinema_type("Cine de autor").await;
        let doc = fx.cinema_type("Documental").await;
        let cuaron = fx.director("Alfonso Cuarón").await;

        let roma = fx.movie("Roma", Some("México"), Some(135), Some(cuaron), Some(auteur)).await;
        let other = fx.movie("Doc", None, Some(60), None, Some(doc)).await;
        fx.showtime(roma, "2026-09-02T20:00:00Z").await;
        fx.showtime(roma, "2026-09-01T20:00:00Z").await;
        fx.showtime(other, "2026-09-01T10:00:00Z").await;

        let rows = fx.catalog.schedule_by_type("Cine de autor").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.cinema_type == "Cine de autor"));
        assert_eq!(rows[0].director.as_deref(), Some("Alfonso Cuarón"));
        assert!(rows[0].starts_at < rows[1].starts_at);

        assert!(fx.catalog.schedule_by_type("No existe").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn movies_by_director_counts_exact_name_only() {
        let fx = Fixture::new();
        let cuaron = fx.director("Alfonso Cuarón").await;
        let toro = fx.director("Guillermo del Toro").await;
        fx.movie("Roma", None, Some(135), Some(cuaron), None).await;
        fx.movie("Gravity", None, Some(91), Some(cuaron), None).await;
        fx.movie("Cronos", None, Some(94), Some(toro), None).await;

        assert_eq!(fx.catalog.movies_by_director("Alfonso Cuarón").await.unwrap(), 2);
        assert_eq!(fx.catalog.movies_by_director("alfonso cuarón").await.unwrap(), 0);
        assert_eq!(fx.catalog.movies_by_director("Nadie").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn movies_by_cinema_type_includes_empty_types_descending() {
        let fx = Fixture::new();
        let auteur = fx.cinema_type("Cine de autor").await;
        fx.cinema_type("Cine mudo").await;
        let doc = fx.cinema_type("Documental").await;
        fx.movie("a", None, Some(90), None, Some(auteur)).await;
        fx.movie("b", None, Some(90), None, Some(auteur)).await;
        fx.movie("c", None, Some(90), None, Some(doc)).await;

        let rows = fx.catalog.movies_by_cinema_type().await.unwrap();
        assert_eq!(
            rows,
            vec![
                TypeCount { cinema_type: "Cine de autor".into(), total: 2 },
                TypeCount { cinema_type: "Documental".into(), total: 1 },
                TypeCount { cinema_type: "Cine mudo".into(), total: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn director_schedule_sorts_by_name_then_time() {
        let fx = Fixture::new();
        let cuaron = fx.director("Alfonso Cuarón").await;
        let bunuel = fx.director("Luis Buñuel").await;
        let ripstein = fx.director("Arturo Ripstein").await;

        let roma = fx.movie("Roma", None, Some(135), Some(cuaron), None).await;
        let olvidados = fx.movie("Los Olvidados", None, Some(85), Some(bunuel), None).await;
        let castillo = fx.movie("El Castillo de la Pureza", None, None, Some(ripstein), None).await;

        fx.showtime(roma, "2026-09-05T20:00:00Z").await;
        fx.showtime(roma, "2026-09-03T20:00:00Z").await;
        fx.showtime(olvidados, "2026-09-01T20:00:00Z").await;
        fx.showtime(castillo, "2026-09-02T20:00:00Z").await;

        let names = vec!["Alfonso Cuarón".to_string(), "Luis Buñuel".to_string()];
        let rows = fx.catalog.schedule_for_directors(&names).await.unwrap();

        // Ripstein was not requested
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].director, "Alfonso Cuarón");
        assert_eq!(rows[0].starts_at, at("2026-09-03T20:00:00Z"));
        assert_eq!(rows[1].starts_at, at("2026-09-05T20:00:00Z"));
        assert_eq!(rows[2].director, "Luis Buñuel");
        assert_eq!(rows[2].runtime_minutes, 85);
    }

    #[tokio::test]
    async fn dashboard_counts_and_next_strictly_upcoming_showtime() {
        let fx = Fixture::new();
        let roma = fx.movie("Roma", Some("México"), Some(135), None, None).await;
        fx.movie("Cronos", Some("México"), Some(94), None, None).await;
        fx.director("Alfonso Cuarón").await;
        fx.showtime(roma, "2026-08-27T20:00:00Z").await;
        fx.showtime(roma, "2026-08-29T20:00:00Z").await;
        fx.showtime(roma, "2026-08-30T20:00:00Z").await;
        fx.store()
            .insert_featurette(NewFeaturette {
                title: "Detrás de cámaras".to_string(),
                description: None,
                runtime_minutes: Some(12),
                aired_at: None,
                movie_id: Some(roma),
            })
            .await
            .unwrap();

        let stats = fx.catalog.dashboard_stats(at("2026-08-28T00:00:00Z")).await.unwrap();
        assert_eq!(stats.movies, 2);
        assert_eq!(stats.showtimes, 3);
        assert_eq!(stats.featurettes, 1);
        assert_eq!(stats.directors, 1);

        let next = stats.next_showtime.unwrap();
        assert_eq!(next.starts_at, at("2026-08-29T20:00:00Z"));
        assert_eq!(next.original_title, "Roma");
    }

    #[tokio::test]
    async fn dashboard_next_showtime_absent_when_nothing_upcoming() {
        let fx = Fixture::new();
        let roma = fx.movie("Roma", None, Some(135), None, None).await;
        fx.showtime(roma, "2026-08-27T20:00:00Z").await;

        let stats = fx.catalog.dashboard_stats(at("2026-08-28T00:00:00Z")).await.unwrap();
        assert!(stats.next_showtime.is_none());
    }
}
