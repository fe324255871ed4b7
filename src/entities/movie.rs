use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    #[sea_orm(primary_key)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
