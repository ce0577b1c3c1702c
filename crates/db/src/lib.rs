//! Database connection factory and migration runner.
//!
//! Modules contribute plain SQL migrations through the kernel `Module` trait;
//! this crate applies each of them exactly once and records it in the
//! `_migrations` bookkeeping table.

use anyhow::Context;
use bibliotech_kernel::settings::DatabaseSettings;
use bibliotech_kernel::Migration;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait,
};

const BOOKKEEPING_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Open a connection pool for the configured database.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database at '{}'", settings.url))?;

    tracing::info!(target: "bibliotech-db", url = %settings.url, "database connected");
    Ok(db)
}

/// Apply every migration that has not been recorded yet.
///
/// Migrations run in the order given; each runs inside its own transaction
/// together with its bookkeeping row. Returns the number applied.
pub async fn run_migrations(
    db: &DatabaseConnection,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    db.execute_unprepared(BOOKKEEPING_TABLE)
        .await
        .context("failed to create migration bookkeeping table")?;

    let backend = db.get_database_backend();
    let mut applied = 0;

    for (module, migration) in migrations {
        let already_applied = db
            .query_one(Statement::from_sql_and_values(
                backend,
                "SELECT 1 FROM _migrations WHERE module = ? AND id = ?",
                [module.as_str().into(), migration.id.into()],
            ))
            .await
            .with_context(|| format!("failed to check migration {}/{}", module, migration.id))?
            .is_some();

        if already_applied {
            tracing::debug!(target: "bibliotech-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let txn = db.begin().await.context("failed to open migration transaction")?;

        for statement in split_statements(migration.up) {
            txn.execute_unprepared(statement)
                .await
                .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        }

        txn.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO _migrations (module, id) VALUES (?, ?)",
            [module.as_str().into(), migration.id.into()],
        ))
        .await
        .with_context(|| format!("failed to record migration {}/{}", module, migration.id))?;

        txn.commit()
            .await
            .with_context(|| format!("failed to commit migration {}/{}", module, migration.id))?;

        tracing::info!(target: "bibliotech-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

fn split_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| !s.is_empty())
}
