//! Application bootstrap shared by the server binary and the CLI.

use anyhow::Context;
use bibliotech_kernel::settings::Settings;
use bibliotech_kernel::{InitCtx, ModuleRegistry};
use sea_orm::DatabaseConnection;

use crate::modules;

/// Registry with every application module registered.
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings);
    registry
}

/// Connect to the database and apply pending migrations.
pub async fn migrate(
    registry: &ModuleRegistry,
    settings: &Settings,
) -> anyhow::Result<DatabaseConnection> {
    let db = bibliotech_db::connect(&settings.database).await?;
    let applied = bibliotech_db::run_migrations(&db, &registry.collect_migrations())
        .await
        .context("failed to run migrations")?;
    tracing::info!(applied, "migrations complete");
    Ok(db)
}

/// Connect, migrate and initialize every module so routes can be mounted.
pub async fn prepare(
    registry: &ModuleRegistry,
    settings: &Settings,
) -> anyhow::Result<DatabaseConnection> {
    let db = migrate(registry, settings).await?;
    registry
        .init_all(&InitCtx {
            settings,
            db: &db,
        })
        .await?;
    Ok(db)
}

/// Run the HTTP service until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bibliotech bootstrap starting"
    );

    let registry = build_registry(&settings);
    let db = prepare(&registry, &settings).await?;
    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };

    registry.start_all(&ctx).await?;
    let served = bibliotech_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;

    if let Err(err) = db.close().await {
        tracing::warn!(error = %err, "failed to close database connection");
    }
    served
}

/// Merged OpenAPI document; needs no database.
pub fn openapi(settings: &Settings) -> serde_json::Value {
    let registry = build_registry(settings);
    bibliotech_http::router::openapi_document(&registry, &settings.openapi)
}
