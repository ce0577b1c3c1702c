use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::covers::{CoverStore, CoverUpload};
use super::entity;
use super::error::CatalogError;
use super::models::BookFields;
use super::repository::BookRepository;

/// Application service encapsulating the book catalog rules.
pub struct CatalogService<R: BookRepository> {
    repo: Arc<R>,
    covers: CoverStore,
}

impl<R: BookRepository> CatalogService<R> {
    pub fn new(repo: Arc<R>, covers: CoverStore) -> Self {
        Self { repo, covers }
    }

    /// Create a book, storing its cover first when one is supplied.
    ///
    /// Code and title must both be unused, whether the existing record is
    /// active or not.
    #[instrument(skip_all, fields(code = %fields.code))]
    pub async fn create(
        &self,
        fields: BookFields,
        cover: Option<CoverUpload>,
    ) -> Result<entity::Model, CatalogError> {
        let code_taken = self.repo.exists_by_code(&fields.code).await?;
        let title_taken = self.repo.exists_by_title(&fields.title).await?;
        if code_taken || title_taken {
            return Err(CatalogError::Conflict(
                "Ya existe un libro con ese código o título".to_string(),
            ));
        }

        let cover = self.store_cover(cover).await?;
        let book = match self.repo.insert(fields, cover.clone()).await {
            Ok(book) => book,
            Err(err) => {
                self.discard_cover(cover).await;
                return Err(err);
            }
        };

        info!(book_id = book.id, cover = ?book.cover, "book created");
        Ok(book)
    }

    pub async fn list(&self) -> Result<Vec<entity::Model>, CatalogError> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<entity::Model>, CatalogError> {
        self.repo.find_by_id(id).await
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<entity::Model>, CatalogError> {
        self.repo.find_by_code(code).await
    }

    /// Overwrite every caller-controlled attribute; the cover is kept.
    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        id: i64,
        fields: BookFields,
    ) -> Result<entity::Model, CatalogError> {
        self.update_with_cover(id, fields, None).await
    }

    /// Like [`Self::update`], replacing the cover reference when a non-empty
    /// upload is given.
    #[instrument(skip(self, fields, cover))]
    pub async fn update_with_cover(
        &self,
        id: i64,
        fields: BookFields,
        cover: Option<CoverUpload>,
    ) -> Result<entity::Model, CatalogError> {
        let mut book = self.require(id).await?;
        fields.apply_to(&mut book);

        let stored = self.store_cover(cover).await?;
        if let Some(name) = &stored {
            book.cover = Some(name.clone());
        }

        let book = match self.repo.save(book).await {
            Ok(book) => book,
            Err(err) => {
                self.discard_cover(stored).await;
                return Err(err);
            }
        };
        info!(book_id = book.id, "book updated");
        Ok(book)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i64) -> Result<entity::Model, CatalogError> {
        let mut book = self.require(id).await?;
        book.active = false;

        let book = self.repo.save(book).await?;
        info!(book_id = book.id, "book deactivated");
        Ok(book)
    }

    /// Set total stock; available stock is lowered to the new total if it
    /// exceeds it and otherwise left alone.
    #[instrument(skip(self))]
    pub async fn update_stock(
        &self,
        id: i64,
        new_total: i32,
    ) -> Result<entity::Model, CatalogError> {
        let mut book = self.require(id).await?;
        book.total_stock = new_total;
        if book.available_stock > new_total {
            book.available_stock = new_total;
        }

        let book = self.repo.save(book).await?;
        info!(
            book_id = book.id,
            total = book.total_stock,
            available = book.available_stock,
            "book stock updated"
        );
        Ok(book)
    }

    /// Remove the record permanently. Absent ids are not an error.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        let removed = self.repo.delete(id).await?;
        info!(book_id = id, removed, "book delete processed");
        Ok(())
    }

    async fn require(&self, id: i64) -> Result<entity::Model, CatalogError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn store_cover(&self, cover: Option<CoverUpload>) -> Result<Option<String>, CatalogError> {
        match cover.filter(|upload| !upload.is_empty()) {
            Some(upload) => Ok(Some(self.covers.save(&upload).await?)),
            None => Ok(None),
        }
    }

    /// Remove a cover written for a record that was never persisted.
    async fn discard_cover(&self, name: Option<String>) {
        let Some(name) = name else {
            return;
        };
        if let Err(err) = tokio::fs::remove_file(self.covers.dir().join(&name)).await {
            warn!(file = %name, error = %err, "failed to remove orphaned cover");
        }
    }
}
