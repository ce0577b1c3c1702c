//! Book catalog: records, cover uploads and the `/libros` API.

pub mod covers;
pub mod entity;
pub mod error;
pub mod models;
mod openapi;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use axum::Router;
use bibliotech_kernel::{InitCtx, Migration, Module};

use crate::utils::log_prefix;
use covers::CoverStore;
use repository::SeaOrmBookRepository;
use routes::SharedCatalog;
use service::CatalogService;

const MODULE_NAME: &str = "libros";

/// Catalog module. The service is wired in [`Module::init`], once the
/// database connection exists.
pub struct CatalogModule {
    catalog: OnceLock<SharedCatalog>,
}

impl CatalogModule {
    pub const fn new() -> Self {
        Self {
            catalog: OnceLock::new(),
        }
    }
}

impl Default for CatalogModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn base_path(&self) -> String {
        format!("/{MODULE_NAME}")
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let repo = Arc::new(SeaOrmBookRepository::new(ctx.db.clone()));
        let covers = CoverStore::new(&ctx.settings.storage.covers_dir);
        let service = Arc::new(CatalogService::new(repo, covers));

        if self.catalog.set(service).is_err() {
            anyhow::bail!("catalog module initialized twice");
        }

        tracing::info!(
            target: "bibliotech::libros",
            prefix = %log_prefix(MODULE_NAME),
            covers_dir = %ctx.settings.storage.covers_dir.display(),
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        match self.catalog.get() {
            Some(catalog) => routes::router(catalog.clone()),
            None => {
                tracing::warn!(
                    target: "bibliotech::libros",
                    "routes requested before init; mounting nothing"
                );
                Router::new()
            }
        }
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_libro",
            up: entity::CREATE_TABLE,
        }]
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(target: "bibliotech::libros", "catalog module stopped");
        Ok(())
    }
}

/// Create a new instance of the catalog module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(CatalogModule::new())
}
