use bibliotech_http::error::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Code, title or ISBN already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("Libro no encontrado con ID: {0}")]
    NotFound(i64),

    #[error("error saving cover image: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                CatalogError::Conflict(format!("duplicate value: {detail}"))
            }
            _ => CatalogError::Database(err),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Conflict(message) => AppError::conflict(Vec::new(), message),
            CatalogError::NotFound(_) => AppError::not_found(err.to_string()),
            CatalogError::Storage(_) | CatalogError::Database(_) => {
                AppError::Internal(anyhow::Error::new(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn not_found_maps_to_404() {
        let app: AppError = CatalogError::NotFound(7).into();
        assert_eq!(app.status(), StatusCode::NOT_FOUND);
        assert!(app.to_string().contains('7'));
    }

    #[test]
    fn conflict_and_storage_map_to_500() {
        let conflict: AppError = CatalogError::Conflict("dup".into()).into();
        assert_eq!(conflict.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let storage: AppError =
            CatalogError::Storage(std::io::Error::other("disk full")).into();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(storage.to_string().contains("disk full"));
    }

    #[test]
    fn generic_db_errors_stay_database_errors() {
        let err = CatalogError::from(DbErr::Custom("boom".into()));
        assert!(matches!(err, CatalogError::Database(_)));
    }
}
