//! `libro` table mapping.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "libro")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub publisher: Option<String>,
    #[sea_orm(unique)]
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub total_stock: i32,
    pub available_stock: i32,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Category the book belongs to; only the identifier is kept.
    pub category_id: Option<i64>,
    /// Generated filename of the stored cover image.
    pub cover: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

/// Schema of the `libro` table, applied once by the migration runner.
pub const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS libro (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        code             TEXT    NOT NULL,
        title            TEXT    NOT NULL,
        description      TEXT,
        author           TEXT    NOT NULL,
        publisher        TEXT,
        isbn             TEXT,
        publication_year INTEGER,
        total_stock      INTEGER NOT NULL DEFAULT 0,
        available_stock  INTEGER NOT NULL DEFAULT 0,
        active           BOOLEAN NOT NULL DEFAULT 1,
        created_at       TEXT    NOT NULL,
        updated_at       TEXT    NOT NULL,
        category_id      INTEGER,
        cover            TEXT
    );
    CREATE UNIQUE INDEX IF NOT EXISTS libro_code_unique ON libro (code);
    CREATE UNIQUE INDEX IF NOT EXISTS libro_isbn_unique ON libro (isbn);
    CREATE INDEX IF NOT EXISTS libro_title_idx ON libro (title);
"#;
