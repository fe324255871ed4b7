use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::{
    entities::{cinema_type, director, featurette, movie, showtime},
    error::{AppError, AppResult},
    models::{
        CinemaType, Director, Featurette, Movie, MovieUpdate, NewFeaturette, NewMovie, NewShowtime,
        Showtime,
    },
    store::CatalogStore,
};

/// Sqlite backend over the sea-orm entities. Timestamps are persisted as
/// RFC 3339 text and parsed on read.
#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<movie::Model> for Movie {
    fn from(row: movie::Model) -> Self {
        Self {
            id: row.id,
            original_title: row.original_title,
            localized_title: row.localized_title,
            synopsis: row.synopsis,
            release_year: row.release_year,
            country: row.country,
            runtime_minutes: row.runtime_minutes,
            tech_sheet: row.tech_sheet,
            director_id: row.director_id,
            cinema_type_id: row.cinema_type_id,
        }
    }
}

fn showtime_from_row(row: showtime::Model) -> AppResult<Showtime> {
    Ok(Showtime { id: row.id, starts_at: row.starts_at.parse()?, movie_id: row.movie_id })
}

fn featurette_from_row(row: featurette::Model) -> AppResult<Featurette> {
    let aired_at = match row.aired_at {
        Some(text) => Some(text.parse()?),
        None => None,
    };
    Ok(Featurette {
        id: row.id,
        title: row.title,
        description: row.description,
        runtime_minutes: row.runtime_minutes,
        aired_at,
        movie_id: row.movie_id,
    })
}

#[async_trait]
impl CatalogStore for SqlStore {
    async fn cinema_types(&self) -> AppResult<Vec<CinemaType>> {
        let rows = cinema_type::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(|r| CinemaType { id: r.id, name: r.name }).collect())
    }

    async fn directors(&self) -> AppResult<Vec<Director>> {
        let rows = director::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(|r| Director { id: r.id, name: r.name }).collect())
    }

    async fn movies(&self) -> AppResult<Vec<Movie>> {
        let rows = movie::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn movie(&self, id: i32) -> AppResult<Option<Movie>> {
        let row = movie::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Movie::from))
    }

    async fn showtimes(&self) -> AppResult<Vec<Showtime>> {
        let rows = showtime::Entity::find().all(&self.db).await?;
        rows.into_iter().map(showtime_from_row).collect()
    }

    async fn featurettes(&self) -> AppResult<Vec<Featurette>> {
        let rows = featurette::Entity::find().all(&self.db).await?;
        rows.into_iter().map(featurette_from_row).collect()
    }

    async fn insert_cinema_type(&self, name: String) -> AppResult<i32> {
        let model = cinema_type::ActiveModel { id: Default::default(), name: Set(name) };
        let res = cinema_type::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    async fn insert_director(&self, name: String) -> AppResult<i32> {
        let model = director::ActiveModel { id: Default::default(), name: Set(name) };
        let res = director::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    async fn insert_movie(&self, new: NewMovie) -> AppResult<i32> {
        let model = movie::ActiveModel {
            id: Default::default(),
            original_title: Set(new.original_title),
            localized_title: Set(new.localized_title),
            synopsis: Set(new.synopsis),
            release_year: Set(new.release_year),
            country: Set(new.country),
            runtime_minutes: Set(new.runtime_minutes),
            tech_sheet: Set(new.tech_sheet),
            director_id: Set(new.director_id),
            cinema_type_id: Set(new.cinema_type_id),
        };
        let res = movie::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    async fn insert_showtime(&self, new: NewShowtime) -> AppResult<i32> {
        let model = showtime::ActiveModel {
            id: Default::default(),
            starts_at: Set(new.starts_at.to_string()),
            movie_id: Set(new.movie_id),
        };
        let res = showtime::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    async fn insert_featurette(&self, new: NewFeaturette) -> AppResult<i32> {
        let model = featurette::ActiveModel {
            id: Default::default(),
            title: Set(new.title),
            description: Set(new.description),
            runtime_minutes: Set(new.runtime_minutes),
            aired_at: Set(new.aired_at.map(|t| t.to_string())),
            movie_id: Set(new.movie_id),
        };
        let res = featurette::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    async fn update_movie(&self, id: i32, update: MovieUpdate) -> AppResult<()> {
        let row = movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("movie"))?;

        let mut active: movie::ActiveModel = row.into();
        if let Some(v) = update.original_title {
            active.original_title = Set(v);
        }
        if let Some(v) = update.localized_title {
            active.localized_title = Set(v);
        }
        if let Some(v) = update.synopsis {
            active.synopsis = Set(v);
        }
        if let Some(v) = update.release_year {
            active.release_year = Set(v);
        }
        if let Some(v) = update.country {
            active.country = Set(v);
        }
        if let Some(v) = update.runtime_minutes {
            active.runtime_minutes = Set(v);
        }
        if let Some(v) = update.tech_sheet {
            active.tech_sheet = Set(v);
        }
        if let Some(v) = update.director_id {
            active.director_id = Set(v);
        }
        if let Some(v) = update.cinema_type_id {
            active.cinema_type_id = Set(v);
        }
        active.update(&self.db).await?;
        Ok(())
    }
}
