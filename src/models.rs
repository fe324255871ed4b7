use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CinemaType {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Director {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Movie {
    pub id: i32,
    pub original_title: String,
    pub localized_title: Option<String>,
    pub synopsis: Option<String>,
    pub release_year: i32,
    pub country: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub tech_sheet: Option<String>,
    pub director_id: Option<i32>,
    pub cinema_type_id: Option<i32>,
}

impl Movie {
    /// Localized title when present, original title otherwise.
    pub fn display_title(&self) -> &str {
        self.localized_title.as_deref().unwrap_or(&self.original_title)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Showtime {
    pub id: i32,
    pub starts_at: Timestamp,
    pub movie_id: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Featurette {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub aired_at: Option<Timestamp>,
    pub movie_id: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMovie {
    pub original_title: String,
    #[serde(default)]
    pub localized_title: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    pub release_year: i32,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub runtime_minutes: Option<i32>,
    #[serde(default)]
    pub tech_sheet: Option<String>,
    #[serde(default)]
    pub director_id: Option<i32>,
    #[serde(default)]
    pub cinema_type_id: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewShowtime {
    pub starts_at: Timestamp,
    pub movie_id: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewFeaturette {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub runtime_minutes: Option<i32>,
    #[serde(default)]
    pub aired_at: Option<Timestamp>,
    #[serde(default)]
    pub movie_id: Option<i32>,
}

/// Partial movie update. Nullable columns use a double `Option` so that an
/// absent field leaves the column untouched while an explicit `null` clears it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieUpdate {
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub localized_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub synopsis: Option<Option<String>>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub runtime_minutes: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tech_sheet: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub director_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cinema_type_id: Option<Option<i32>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl MovieUpdate {
    pub fn synopsis_only(text: String) -> Self {
        Self { synopsis: Some(Some(text)), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.original_title.is_none()
            && self.localized_title.is_none()
            && self.synopsis.is_none()
            && self.release_year.is_none()
            && self.country.is_none()
            && self.runtime_minutes.is_none()
            && self.tech_sheet.is_none()
            && self.director_id.is_none()
            && self.cinema_type_id.is_none()
    }

    /// Shallow merge: supplied fields overwrite, absent fields are kept.
    pub fn apply(&self, movie: &mut Movie) {
        if let Some(v) = &self.original_title {
            movie.original_title = v.clone();
        }
        if let Some(v) = &self.localized_title {
            movie.localized_title = v.clone();
        }
        if let Some(v) = &self.synopsis {
            movie.synopsis = v.clone();
        }
        if let Some(v) = self.release_year {
            movie.release_year = v;
        }
        if let Some(v) = &self.country {
            movie.country = v.clone();
        }
        if let Some(v) = self.runtime_minutes {
            movie.runtime_minutes = v;
        }
        if let Some(v) = &self.tech_sheet {
            movie.tech_sheet = v.clone();
        }
        if let Some(v) = self.director_id {
            movie.director_id = v;
        }
        if let Some(v) = self.cinema_type_id {
            movie.cinema_type_id = v;
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieView {
    #[serde(flatten)]
    pub movie: Movie,
    pub director_name: Option<String>,
    pub cinema_type_name: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShowtimeView {
    #[serde(flatten)]
    pub showtime: Showtime,
    pub original_title: String,
    pub localized_title: Option<String>,
    pub runtime_minutes: Option<i32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FeaturetteView {
    #[serde(flatten)]
    pub featurette: Featurette,
    pub movie_title: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MutationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub message: String,
}

impl MutationOutcome {
    pub fn created(id: i32, message: impl Into<String>) -> Self {
        Self { success: true, id: Some(id), message: message.into() }
    }

    pub fn applied(message: impl Into<String>) -> Self {
        Self { success: true, id: None, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, id: None, message: message.into() }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ScheduleRow {
    pub cinema_type: String,
    pub title: String,
    pub director: Option<String>,
    pub starts_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeCount {
    pub cinema_type: String,
    pub total: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct CountryRuntime {
    pub country: String,
    pub average_minutes: f64,
    pub movie_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct UpcomingRow {
    pub starts_at: Timestamp,
    pub title: String,
    pub director: Option<String>,
    pub cinema_type: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DirectorScheduleRow {
    pub starts_at: Timestamp,
    pub title: String,
    pub director: String,
    pub runtime_minutes: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct NextShowtime {
    pub id: i32,
    pub starts_at: Timestamp,
    pub movie_id: i32,
    pub original_title: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct DashboardStats {
    pub movies: usize,
    pub showtimes: usize,
    pub featurettes: usize,
    pub directors: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_showtime: Option<NextShowtime>,
}
