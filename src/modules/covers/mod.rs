//! Serves stored cover images as static files.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bibliotech_kernel::{InitCtx, Module};
use tower_http::services::ServeDir;

/// Core module exposing the covers directory under the configured public
/// path (`/imagenes` by default).
pub struct CoversModule {
    public_path: String,
    dir: OnceLock<PathBuf>,
}

impl CoversModule {
    pub fn new(public_path: impl Into<String>) -> Self {
        Self {
            public_path: public_path.into(),
            dir: OnceLock::new(),
        }
    }
}

#[async_trait]
impl Module for CoversModule {
    fn name(&self) -> &'static str {
        "covers"
    }

    fn base_path(&self) -> String {
        self.public_path.clone()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let dir = ctx.settings.storage.covers_dir.clone();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create covers directory {}", dir.display()))?;

        if self.dir.set(dir.clone()).is_err() {
            anyhow::bail!("covers module initialized twice");
        }

        tracing::info!(
            target: "bibliotech::covers",
            dir = %dir.display(),
            public_path = %self.public_path,
            "serving cover images"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        match self.dir.get() {
            Some(dir) => Router::new().route_service("/{*file}", ServeDir::new(dir)),
            None => Router::new(),
        }
    }
}

pub fn create_module(public_path: impl Into<String>) -> Arc<dyn Module> {
    Arc::new(CoversModule::new(public_path))
}
