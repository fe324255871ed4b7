use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CinemaType::Table)
                    .if_not_exists()
                    .col(pk_auto(CinemaType::Id))
                    .col(string(CinemaType::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Director::Table)
                    .if_not_exists()
                    .col(pk_auto(Director::Id))
                    .col(string(Director::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string(Movie::OriginalTitle))
                    .col(string_null(Movie::LocalizedTitle))
                    .col(text_null(Movie::Synopsis))
                    .col(integer(Movie::ReleaseYear))
                    .col(string_null(Movie::Country))
                    .col(integer_null(Movie::RuntimeMinutes))
                    .col(text_null(Movie::TechSheet))
                    .col(integer_null(Movie::DirectorId))
                    .col(integer_null(Movie::CinemaTypeId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_director")
                    .table(Movie::Table)
                    .col(Movie::DirectorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_cinema_type")
                    .table(Movie::Table)
                    .col(Movie::CinemaTypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Showtime::Table)
                    .if_not_exists()
                    .col(pk_auto(Showtime::Id))
                    .col(string(Showtime::StartsAt))
                    .col(integer(Showtime::MovieId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_showtime_movie")
                    .table(Showtime::Table)
                    .col(Showtime::MovieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Featurette::Table)
                    .if_not_exists()
                    .col(pk_auto(Featurette::Id))
                    .col(string(Featurette::Title))
                    .col(text_null(Featurette::Description))
                    .col(integer_null(Featurette::RuntimeMinutes))
                    .col(string_null(Featurette::AiredAt))
                    .col(integer_null(Featurette::MovieId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_featurette_movie")
                    .table(Featurette::Table)
                    .col(Featurette::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Featurette::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Showtime::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Director::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CinemaType::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum CinemaType {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Director {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    OriginalTitle,
    LocalizedTitle,
    Synopsis,
    ReleaseYear,
    Country,
    RuntimeMinutes,
    TechSheet,
    DirectorId,
    CinemaTypeId,
}

#[derive(DeriveIden)]
enum Showtime {
    Table,
    Id,
    StartsAt,
    MovieId,
}

#[derive(DeriveIden)]
enum Featurette {
    Table,
    Id,
    Title,
    Description,
    RuntimeMinutes,
    AiredAt,
    MovieId,
}
