//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{SortColumn, UserRecord};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain record
impl From<Model> for UserRecord {
    fn from(model: Model) -> Self {
        UserRecord {
            id: model.id,
            name: model.name,
            surname: model.surname,
            patronymic: model.patronymic,
            age: model.age,
            gender: model.gender,
            nationality: model.nationality,
        }
    }
}

/// Map the permitted sort columns onto entity columns
impl From<SortColumn> for Column {
    fn from(sort: SortColumn) -> Self {
        match sort {
            SortColumn::Id => Column::Id,
            SortColumn::Name => Column::Name,
            SortColumn::Surname => Column::Surname,
            SortColumn::Patronymic => Column::Patronymic,
            SortColumn::Age => Column::Age,
            SortColumn::Gender => Column::Gender,
            SortColumn::Nationality => Column::Nationality,
        }
    }
}
