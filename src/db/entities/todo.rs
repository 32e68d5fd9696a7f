use sea_orm::entity::prelude::*;

/// A task record. `created` is written once on insert; `modified` moves on
/// every write that changes a field.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    #[sea_orm(default_value = false)]
    pub status: bool,
    pub created: DateTimeWithTimeZone,
    pub modified: DateTimeWithTimeZone,
}

impl ActiveModelBehavior for ActiveModel {}
