use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    /// Catalog work key, e.g. `OL45804W`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub author: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub page_count: Option<i32>,
    pub published_date: Option<String>,
    pub publisher: Option<String>,
    pub language: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::book_entries::Entity")]
    BookEntries,
}

impl Related<super::book_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
