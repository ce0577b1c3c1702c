//! Multipart form binding for the cover upload endpoints.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use bibliotech_http::error::AppError;

use crate::modules::catalog::covers::CoverUpload;
use crate::modules::catalog::models::BookFields;

const COVER_FIELD: &str = "portada";

/// Text fields and the optional cover file of a book form.
#[derive(Debug, Default)]
pub(crate) struct BookForm {
    values: HashMap<String, String>,
    cover: Option<CoverUpload>,
}

impl BookForm {
    pub(crate) async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = BookForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::bad_request(format!("invalid multipart body: {err}")))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == COVER_FIELD {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(|err| {
                    AppError::bad_request(format!("failed to read '{COVER_FIELD}': {err}"))
                })?;
                form.cover = Some(CoverUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(|err| {
                    AppError::bad_request(format!("failed to read '{name}': {err}"))
                })?;
                form.values.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Bind the form to book attributes.
    ///
    /// `estado` is required when `require_active` is set (updates) and
    /// defaults to active otherwise.
    pub(crate) fn into_book(
        self,
        require_active: bool,
    ) -> Result<(BookFields, Option<CoverUpload>), AppError> {
        let active = if require_active {
            parse_bool("estado", self.required("estado")?)?
        } else {
            true
        };

        let fields = BookFields {
            code: self.required("codigo")?.to_string(),
            title: self.required("titulo")?.to_string(),
            description: self.optional("descripcion").map(str::to_string),
            author: self.required("autor")?.to_string(),
            publisher: self.optional("editorial").map(str::to_string),
            isbn: self.optional("isbn").map(str::to_string),
            publication_year: self
                .optional("anioPublicacion")
                .map(|raw| parse_number("anioPublicacion", raw))
                .transpose()?,
            total_stock: parse_number("stockTotal", self.required("stockTotal")?)?,
            available_stock: parse_number("stockDisponible", self.required("stockDisponible")?)?,
            active,
            category_id: Some(parse_number("categoriaId", self.required("categoriaId")?)?),
        };

        Ok((fields, self.cover))
    }

    fn required(&self, name: &str) -> Result<&str, AppError> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::bad_request(format!("missing required field '{name}'")))
    }

    /// Absent and blank values are both treated as not provided.
    fn optional(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("invalid number for '{name}': '{raw}'")))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(AppError::bad_request(format!(
            "invalid boolean for '{name}': '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> BookForm {
        BookForm {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            cover: None,
        }
    }

    const CREATE: &[(&str, &str)] = &[
        ("codigo", "LIB-1"),
        ("titulo", "Rayuela"),
        ("autor", "Julio Cortázar"),
        ("stockTotal", "4"),
        ("stockDisponible", "2"),
        ("categoriaId", "9"),
        ("isbn", "   "),
        ("anioPublicacion", "1963"),
    ];

    #[test]
    fn binds_create_form() {
        let (fields, cover) = form(CREATE).into_book(false).unwrap();
        assert_eq!(fields.code, "LIB-1");
        assert_eq!(fields.total_stock, 4);
        assert_eq!(fields.available_stock, 2);
        assert_eq!(fields.category_id, Some(9));
        assert_eq!(fields.publication_year, Some(1963));
        assert_eq!(fields.isbn, None);
        assert!(fields.active);
        assert!(cover.is_none());
    }

    #[test]
    fn update_form_requires_estado() {
        let err = form(CREATE).into_book(true).unwrap_err();
        assert!(err.to_string().contains("estado"));

        let mut pairs = CREATE.to_vec();
        pairs.push(("estado", "false"));
        let (fields, _) = form(&pairs).into_book(true).unwrap();
        assert!(!fields.active);
    }

    #[test]
    fn missing_required_field_is_bad_request() {
        let pairs: Vec<_> = CREATE.iter().copied().filter(|(k, _)| *k != "autor").collect();
        let err = form(&pairs).into_book(false).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("autor"));
    }

    #[test]
    fn non_numeric_stock_is_bad_request() {
        let mut pairs = CREATE.to_vec();
        pairs.retain(|(k, _)| *k != "stockTotal");
        pairs.push(("stockTotal", "muchos"));
        let err = form(&pairs).into_book(false).unwrap_err();
        assert!(err.to_string().contains("stockTotal"));
    }
}
