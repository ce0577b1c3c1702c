use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity;

/// Reference to a category by identifier only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
}

/// A book as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "editorial")]
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    #[serde(rename = "anioPublicacion")]
    pub publication_year: Option<i32>,
    #[serde(rename = "stockTotal")]
    pub total_stock: i32,
    #[serde(rename = "stockDisponible")]
    pub available_stock: i32,
    #[serde(rename = "estado")]
    pub active: bool,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "categoria")]
    pub category: Option<CategoryRef>,
    #[serde(rename = "portada")]
    pub cover: Option<String>,
}

impl From<entity::Model> for Book {
    fn from(model: entity::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            title: model.title,
            description: model.description,
            author: model.author,
            publisher: model.publisher,
            isbn: model.isbn,
            publication_year: model.publication_year,
            total_stock: model.total_stock,
            available_stock: model.available_stock,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
            category: model.category_id.map(|id| CategoryRef { id }),
            cover: model.cover,
        }
    }
}

/// JSON body accepted by create and full update.
///
/// Server-managed keys (`id`, timestamps, `portada`) are ignored if sent.
#[derive(Debug, Clone, Deserialize)]
pub struct BookPayload {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "editorial", default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(rename = "anioPublicacion", default)]
    pub publication_year: Option<i32>,
    #[serde(rename = "stockTotal", default)]
    pub total_stock: i32,
    #[serde(rename = "stockDisponible", default)]
    pub available_stock: i32,
    #[serde(rename = "estado", default = "default_active")]
    pub active: bool,
    #[serde(rename = "categoria", default)]
    pub category: Option<CategoryRef>,
}

fn default_active() -> bool {
    true
}

/// The caller-controlled attributes of a book.
///
/// Create stores them as given; full updates overwrite every one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub author: String,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub total_stock: i32,
    pub available_stock: i32,
    pub active: bool,
    pub category_id: Option<i64>,
}

impl BookFields {
    /// Overwrite the mutable attributes of a stored book.
    pub fn apply_to(self, model: &mut entity::Model) {
        model.code = self.code;
        model.title = self.title;
        model.description = self.description;
        model.author = self.author;
        model.publisher = self.publisher;
        model.isbn = self.isbn;
        model.publication_year = self.publication_year;
        model.total_stock = self.total_stock;
        model.available_stock = self.available_stock;
        model.category_id = self.category_id;
        model.active = self.active;
    }
}

impl From<BookPayload> for BookFields {
    fn from(payload: BookPayload) -> Self {
        Self {
            code: payload.code,
            title: payload.title,
            description: payload.description,
            author: payload.author,
            publisher: payload.publisher,
            isbn: payload.isbn,
            publication_year: payload.publication_year,
            total_stock: payload.total_stock,
            available_stock: payload.available_stock,
            active: payload.active,
            category_id: payload.category.map(|c| c.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_defaults_stock_and_active() {
        let payload: BookPayload = serde_json::from_value(json!({
            "codigo": "LIB-001",
            "titulo": "Cien años de soledad",
            "autor": "Gabriel García Márquez"
        }))
        .unwrap();

        let fields = BookFields::from(payload);
        assert_eq!(fields.total_stock, 0);
        assert_eq!(fields.available_stock, 0);
        assert!(fields.active);
        assert_eq!(fields.category_id, None);
    }

    #[test]
    fn payload_ignores_server_managed_keys() {
        let payload: BookPayload = serde_json::from_value(json!({
            "id": 99,
            "codigo": "LIB-002",
            "titulo": "Rayuela",
            "autor": "Julio Cortázar",
            "portada": "ignored.png",
            "fechaCreacion": "2020-01-01T00:00:00Z",
            "categoria": { "id": 4 },
            "estado": false
        }))
        .unwrap();

        let fields = BookFields::from(payload);
        assert_eq!(fields.category_id, Some(4));
        assert!(!fields.active);
    }

    #[test]
    fn book_serializes_with_wire_names() {
        let now = Utc::now();
        let book = Book::from(entity::Model {
            id: 1,
            code: "LIB-003".into(),
            title: "Ficciones".into(),
            description: None,
            author: "Jorge Luis Borges".into(),
            publisher: Some("Sur".into()),
            isbn: None,
            publication_year: Some(1944),
            total_stock: 5,
            available_stock: 3,
            active: true,
            created_at: now,
            updated_at: now,
            category_id: Some(2),
            cover: None,
        });

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["codigo"], "LIB-003");
        assert_eq!(value["anioPublicacion"], 1944);
        assert_eq!(value["stockDisponible"], 3);
        assert_eq!(value["categoria"]["id"], 2);
        assert!(value["portada"].is_null());
        assert!(value["descripcion"].is_null());
    }
}
