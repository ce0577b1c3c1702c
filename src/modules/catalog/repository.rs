use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::entity::{self, Entity as LibroEntity};
use super::error::CatalogError;
use super::models::BookFields;

/// Data access for book records.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<entity::Model>, CatalogError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<entity::Model>, CatalogError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<entity::Model>, CatalogError>;
    async fn exists_by_code(&self, code: &str) -> Result<bool, CatalogError>;
    async fn exists_by_title(&self, title: &str) -> Result<bool, CatalogError>;
    /// Insert a new record; id and timestamps are generated.
    async fn insert(
        &self,
        fields: BookFields,
        cover: Option<String>,
    ) -> Result<entity::Model, CatalogError>;
    /// Persist every attribute of an existing record.
    async fn save(&self, book: entity::Model) -> Result<entity::Model, CatalogError>;
    /// Returns true if a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, CatalogError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<entity::Model>, CatalogError> {
        let rows = LibroEntity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<entity::Model>, CatalogError> {
        Ok(LibroEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<entity::Model>, CatalogError> {
        let found = LibroEntity::find()
            .filter(entity::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, CatalogError> {
        let count = LibroEntity::find()
            .filter(entity::Column::Code.eq(code))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_title(&self, title: &str) -> Result<bool, CatalogError> {
        let count = LibroEntity::find()
            .filter(entity::Column::Title.eq(title))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert(
        &self,
        fields: BookFields,
        cover: Option<String>,
    ) -> Result<entity::Model, CatalogError> {
        let am = entity::ActiveModel {
            code: Set(fields.code),
            title: Set(fields.title),
            description: Set(fields.description),
            author: Set(fields.author),
            publisher: Set(fields.publisher),
            isbn: Set(fields.isbn),
            publication_year: Set(fields.publication_year),
            total_stock: Set(fields.total_stock),
            available_stock: Set(fields.available_stock),
            active: Set(fields.active),
            category_id: Set(fields.category_id),
            cover: Set(cover),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn save(&self, book: entity::Model) -> Result<entity::Model, CatalogError> {
        let am = entity::ActiveModel {
            id: Unchanged(book.id),
            code: Set(book.code),
            title: Set(book.title),
            description: Set(book.description),
            author: Set(book.author),
            publisher: Set(book.publisher),
            isbn: Set(book.isbn),
            publication_year: Set(book.publication_year),
            total_stock: Set(book.total_stock),
            available_stock: Set(book.available_stock),
            active: Set(book.active),
            created_at: Unchanged(book.created_at),
            updated_at: Set(book.updated_at),
            category_id: Set(book.category_id),
            cover: Set(book.cover),
        };
        Ok(am.update(&self.db).await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, CatalogError> {
        let res = LibroEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
