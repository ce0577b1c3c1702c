//! HTTP handlers for `/libros`.

mod form;

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use bibliotech_http::error::AppError;
use bibliotech_http::extract::{AppJson, AppPath};

use super::models::{Book, BookFields, BookPayload};
use super::repository::SeaOrmBookRepository;
use super::service::CatalogService;
use form::BookForm;

/// Catalog service shared by every handler.
pub type SharedCatalog = Arc<CatalogService<SeaOrmBookRepository>>;

/// Build the `/libros` router.
pub fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/crear-con-portada", post(create_with_cover))
        .route("/buscar/codigo/{codigo}", get(find_by_code))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .route("/{id}/desactivar", put(deactivate_book))
        .route("/{id}/stock", put(update_stock))
        .route("/{id}/actualizar-con-portada", put(update_with_cover))
        .with_state(catalog)
}

async fn health_check() -> &'static str {
    "libros module is healthy"
}

async fn create_with_cover(
    State(catalog): State<SharedCatalog>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Book>, AppError> {
    let (fields, cover) = BookForm::read(multipart?).await?.into_book(false)?;
    let book = catalog.create(fields, cover).await?;
    Ok(Json(book.into()))
}

async fn create_book(
    State(catalog): State<SharedCatalog>,
    AppJson(payload): AppJson<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let book = catalog.create(BookFields::from(payload), None).await?;
    Ok(Json(book.into()))
}

async fn list_books(State(catalog): State<SharedCatalog>) -> Result<Json<Vec<Book>>, AppError> {
    let books = catalog.list().await?;
    tracing::debug!(count = books.len(), "list books");
    Ok(Json(books.into_iter().map(Book::from).collect()))
}

async fn get_book(
    State(catalog): State<SharedCatalog>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Book>, AppError> {
    catalog
        .get_by_id(id)
        .await?
        .map(|book| Json(book.into()))
        .ok_or_else(|| AppError::not_found(format!("Libro no encontrado con ID: {id}")))
}

async fn update_book(
    State(catalog): State<SharedCatalog>,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let book = catalog.update(id, BookFields::from(payload)).await?;
    Ok(Json(book.into()))
}

async fn delete_book(
    State(catalog): State<SharedCatalog>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn deactivate_book(
    State(catalog): State<SharedCatalog>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    catalog.deactivate(id).await?;
    Ok(StatusCode::OK)
}

async fn update_stock(
    State(catalog): State<SharedCatalog>,
    AppPath(id): AppPath<i64>,
    AppJson(new_total): AppJson<i32>,
) -> Result<Json<Book>, AppError> {
    let book = catalog.update_stock(id, new_total).await?;
    Ok(Json(book.into()))
}

async fn update_with_cover(
    State(catalog): State<SharedCatalog>,
    AppPath(id): AppPath<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Book>, AppError> {
    let (fields, cover) = BookForm::read(multipart?).await?.into_book(true)?;
    let book = catalog.update_with_cover(id, fields, cover).await?;
    Ok(Json(book.into()))
}

async fn find_by_code(
    State(catalog): State<SharedCatalog>,
    AppPath(codigo): AppPath<String>,
) -> Result<Json<Book>, AppError> {
    catalog
        .get_by_code(&codigo)
        .await?
        .map(|book| Json(book.into()))
        .ok_or_else(|| AppError::not_found(format!("Libro no encontrado con código: {codigo}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::test_support::catalog;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "bibliotech-boundary";

    async fn test_router() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let service = catalog(dir.path()).await;
        (router(Arc::new(service)), dir)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn multipart_request(
        method: Method,
        uri: &str,
        fields: &[(&str, &str)],
        cover: Option<(&str, &[u8])>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, bytes)) = cover {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"portada\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn book_json(code: &str, title: &str) -> Value {
        json!({
            "codigo": code,
            "titulo": title,
            "autor": "Ernesto Sabato",
            "stockTotal": 6,
            "stockDisponible": 6,
            "categoria": { "id": 1 }
        })
    }

    #[tokio::test]
    async fn create_and_fetch_book() {
        let (router, _dir) = test_router().await;

        let (status, created) = send(
            &router,
            json_request(Method::POST, "/", book_json("LIB-1", "El túnel")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["codigo"], "LIB-1");
        assert_eq!(created["estado"], true);
        assert_eq!(created["fechaCreacion"], created["fechaActualizacion"]);

        let id = created["id"].as_i64().unwrap();
        let (status, fetched) = send(&router, empty_request(Method::GET, &format!("/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, by_code) =
            send(&router, empty_request(Method::GET, "/buscar/codigo/LIB-1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(by_code["id"], id);

        let (status, listed) = send(&router, empty_request(Method::GET, "/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_book_is_404() {
        let (router, _dir) = test_router().await;

        let (status, body) = send(&router, empty_request(Method::GET, "/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");

        let (status, _) = send(&router, empty_request(Method::GET, "/buscar/codigo/NADA")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, empty_request(Method::PUT, "/42/desactivar")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, json_request(Method::PUT, "/42/stock", json!(3))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &router,
            json_request(Method::PUT, "/42", book_json("X", "Y")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_create_is_500() {
        let (router, _dir) = test_router().await;
        let request = || json_request(Method::POST, "/", book_json("LIB-2", "Abaddón"));

        let (status, _) = send(&router, request()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&router, request()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn stock_deactivate_and_delete() {
        let (router, _dir) = test_router().await;
        let (_, created) = send(
            &router,
            json_request(Method::POST, "/", book_json("LIB-3", "Héroes")),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, stocked) =
            send(&router, json_request(Method::PUT, &format!("/{id}/stock"), json!(2))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stocked["stockTotal"], 2);
        assert_eq!(stocked["stockDisponible"], 2);

        let (status, body) =
            send(&router, empty_request(Method::PUT, &format!("/{id}/desactivar"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());

        let (_, fetched) = send(&router, empty_request(Method::GET, &format!("/{id}"))).await;
        assert_eq!(fetched["estado"], false);

        let (status, _) = send(&router, empty_request(Method::DELETE, &format!("/{id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&router, empty_request(Method::DELETE, &format!("/{id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&router, empty_request(Method::GET, &format!("/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    const FORM: &[(&str, &str)] = &[
        ("codigo", "LIB-4"),
        ("titulo", "Bomarzo"),
        ("autor", "Manuel Mujica Lainez"),
        ("descripcion", ""),
        ("stockTotal", "3"),
        ("stockDisponible", "1"),
        ("categoriaId", "2"),
    ];

    #[tokio::test]
    async fn create_with_cover_stores_file() {
        let (router, dir) = test_router().await;

        let (status, created) = send(
            &router,
            multipart_request(
                Method::POST,
                "/crear-con-portada",
                FORM,
                Some(("bomarzo.png", b"PNG")),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["categoria"]["id"], 2);
        assert!(created["descripcion"].is_null());
        let cover = created["portada"].as_str().unwrap();
        assert!(cover.ends_with("_bomarzo.png"));
        assert_eq!(std::fs::read(dir.path().join(cover)).unwrap(), b"PNG");
    }

    #[tokio::test]
    async fn create_with_cover_without_file() {
        let (router, _dir) = test_router().await;

        let (status, created) = send(
            &router,
            multipart_request(Method::POST, "/crear-con-portada", FORM, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(created["portada"].is_null());
    }

    #[tokio::test]
    async fn multipart_missing_field_is_400() {
        let (router, _dir) = test_router().await;
        let partial: Vec<_> = FORM.iter().copied().filter(|(k, _)| *k != "titulo").collect();

        let (status, body) = send(
            &router,
            multipart_request(Method::POST, "/crear-con-portada", &partial, None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn update_with_cover_replaces_fields_and_cover() {
        let (router, dir) = test_router().await;
        let (_, created) = send(
            &router,
            multipart_request(
                Method::POST,
                "/crear-con-portada",
                FORM,
                Some(("vieja.png", b"OLD")),
            ),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let mut update = FORM.to_vec();
        update.retain(|(k, _)| *k != "titulo");
        update.push(("titulo", "Bomarzo (reedición)"));
        update.push(("estado", "false"));

        let (status, updated) = send(
            &router,
            multipart_request(
                Method::PUT,
                &format!("/{id}/actualizar-con-portada"),
                &update,
                Some(("nueva.png", b"NEW")),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["titulo"], "Bomarzo (reedición)");
        assert_eq!(updated["estado"], false);
        let cover = updated["portada"].as_str().unwrap();
        assert!(cover.ends_with("_nueva.png"));
        assert_eq!(std::fs::read(dir.path().join(cover)).unwrap(), b"NEW");
    }

    #[tokio::test]
    async fn invalid_path_id_is_400_envelope() {
        let (router, _dir) = test_router().await;
        let (status, body) = send(&router, empty_request(Method::GET, "/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn json_body_without_codigo_is_400_envelope() {
        let (router, _dir) = test_router().await;
        let mut payload = book_json("LIB-5", "Sin código");
        payload.as_object_mut().unwrap().remove("codigo");

        let (status, body) = send(&router, json_request(Method::POST, "/", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(body["error"]["message"].as_str().unwrap().contains("codigo"));

        let (_, listed) = send(&router, empty_request(Method::GET, "/")).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_integer_stock_is_400_envelope() {
        let (router, _dir) = test_router().await;
        let (_, created) = send(
            &router,
            json_request(Method::POST, "/", book_json("LIB-6", "Los siete locos")),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, body) = send(
            &router,
            json_request(Method::PUT, &format!("/{id}/stock"), json!("muchos")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn non_multipart_body_is_400_envelope() {
        let (router, _dir) = test_router().await;
        let (status, body) = send(
            &router,
            json_request(Method::POST, "/crear-con-portada", book_json("LIB-7", "X")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }
}
