use tracing::info;

use crate::{
    error::AppResult,
    models::{NewFeaturette, NewMovie, NewShowtime},
    store::CatalogStore,
};

/// Seeds the default dataset into an empty store. Runs exactly once: a store
/// that already holds any record is left untouched.
pub async fn seed_if_empty(store: &dyn CatalogStore) -> AppResult<()> {
    if !store.movies().await?.is_empty()
        || !store.directors().await?.is_empty()
        || !store.cinema_types().await?.is_empty()
    {
        return Ok(());
    }

    let auteur = store.insert_cinema_type("Cine de autor".to_string()).await?;
    let golden = store.insert_cinema_type("Cine de oro mexicano".to_string()).await?;
    let documentary = store.insert_cinema_type("Documental".to_string()).await?;
    store.insert_cinema_type("Cine contemporáneo".to_string()).await?;

    let cuaron = store.insert_director("Alfonso Cuarón".to_string()).await?;
    let inarritu = store.insert_director("Alejandro González Iñárritu".to_string()).await?;
    let del_toro = store.insert_director("Guillermo del Toro".to_string()).await?;
    let bunuel = store.insert_director("Luis Buñuel".to_string()).await?;
    let novaro = store.insert_director("María Novaro".to_string()).await?;

    let roma = store
        .insert_movie(NewMovie {
            original_title: "Roma".to_string(),
            localized_title: None,
            synopsis: Some(
                "La vida de una empleada doméstica en la Ciudad de México de los setenta."
                    .to_string(),
            ),
            release_year: 2018,
            country: Some("México".to_string()),
            runtime_minutes: Some(135),
            tech_sheet: Some("Blanco y negro, 65 mm, sonido Atmos".to_string()),
            director_id: Some(cuaron),
            cinema_type_id: Some(auteur),
        })
        .await?;

    let amores = store
        .insert_movie(NewMovie {
            original_title: "Amores Perros".to_string(),
            localized_title: None,
            synopsis: Some("Tres historias cruzadas por un accidente de auto.".to_string()),
            release_year: 2000,
            country: Some("México".to_string()),
            runtime_minutes: Some(154),
            tech_sheet: None,
            director_id: Some(inarritu),
            cinema_type_id: Some(auteur),
        })
        .await?;

    let laberinto = store
        .insert_movie(NewMovie {
            original_title: "El Laberinto del Fauno".to_string(),
            localized_title: Some("El Laberinto del Fauno".to_string()),
            synopsis: Some("Una niña escapa de la posguerra española hacia un mundo de fauna mítica.".to_string()),
            release_year: 2006,
            country: Some("España".to_string()),
            runtime_minutes: Some(118),
            tech_sheet: None,
            director_id: Some(del_toro),
            cinema_type_id: Some(auteur),
        })
        .await?;

    let olvidados = store
        .insert_movie(NewMovie {
            original_title: "Los Olvidados".to_string(),
            localized_title: None,
            synopsis: Some("Jóvenes marginados en los barrios pobres de la capital.".to_string()),
            release_year: 1950,
            country: Some("México".to_string()),
            runtime_minutes: Some(85),
            tech_sheet: Some("Restauración 4K (2004)".to_string()),
            director_id: Some(bunuel),
            cinema_type_id: Some(golden),
        })
        .await?;

    store
        .insert_movie(NewMovie {
            original_title: "Viridiana".to_string(),
            localized_title: None,
            synopsis: None,
            release_year: 1961,
            country: Some("España".to_string()),
            runtime_minutes: Some(90),
            tech_sheet: None,
            director_id: Some(bunuel),
            cinema_type_id: Some(golden),
        })
        .await?;

    let danzon = store
        .insert_movie(NewMovie {
            original_title: "Danzón".to_string(),
            localized_title: None,
            synopsis: Some("Julia viaja a Veracruz tras la desaparición de su pareja de baile.".to_string()),
            release_year: 1991,
            country: Some("México".to_string()),
            runtime_minutes: Some(120),
            tech_sheet: None,
            director_id: Some(novaro),
            cinema_type_id: Some(documentary),
        })
        .await?;

    for (movie_id, ts) in [
        (roma, "2026-09-01T20:00:00Z"),
        (roma, "2026-09-08T20:00:00Z"),
        (amores, "2026-09-02T21:30:00Z"),
        (laberinto, "2026-09-03T19:00:00Z"),
        (olvidados, "2026-09-05T18:00:00Z"),
        (danzon, "2026-09-06T20:00:00Z"),
        (amores, "2026-09-12T21:30:00Z"),
    ] {
        store
            .insert_showtime(NewShowtime { starts_at: ts.parse()?, movie_id })
            .await?;
    }

    for (title, runtime, aired, movie_id) in [
        ("Detrás de cámaras: Roma", 14, Some("2026-09-01T19:30:00Z"), Some(roma)),
        ("Entrevista con Buñuel (archivo)", 22, Some("2026-09-05T17:30:00Z"), Some(olvidados)),
        ("El danzón y su época", 9, None, Some(danzon)),
    ] {
        let aired_at = match aired {
            Some(ts) => Some(ts.parse()?),
            None => None,
        };
        store
            .insert_featurette(NewFeaturette {
                title: title.to_string(),
                description: None,
                runtime_minutes: Some(runtime),
                aired_at,
                movie_id,
            })
            .await?;
    }

    info!("seeded initial catalog data");
    Ok(())
}
