//! OpenAPI fragment for the `/libros` routes. Paths are relative to the
//! module base path.

use serde_json::{json, Value};

fn book_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Libro" } }
        }
    })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
        }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn json_body(schema: Value) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema } }
    })
}

fn multipart_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {
            "multipart/form-data": {
                "schema": { "$ref": format!("#/components/schemas/{schema}") }
            }
        }
    })
}

pub(super) fn fragment() -> Value {
    let tags = json!(["Libros"]);
    let payload = json!({ "$ref": "#/components/schemas/LibroPayload" });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "Obtener todos los libros",
                    "tags": tags,
                    "responses": {
                        "200": {
                            "description": "Lista de libros",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Libro" }
                                    }
                                }
                            }
                        },
                        "500": error_response("Error interno")
                    }
                },
                "post": {
                    "summary": "Crear un nuevo libro",
                    "tags": tags,
                    "requestBody": json_body(payload.clone()),
                    "responses": {
                        "200": book_response("Libro creado"),
                        "400": error_response("Cuerpo inválido"),
                        "500": error_response("Código o título duplicado")
                    }
                }
            },
            "/crear-con-portada": {
                "post": {
                    "summary": "Crear libro con imagen de portada",
                    "tags": tags,
                    "requestBody": multipart_body("LibroForm"),
                    "responses": {
                        "200": book_response("Libro creado"),
                        "400": error_response("Formulario inválido"),
                        "500": error_response("Código o título duplicado, o error al guardar la portada")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Obtener libro por ID",
                    "tags": tags,
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": book_response("Libro encontrado"),
                        "404": error_response("Libro no encontrado")
                    }
                },
                "put": {
                    "summary": "Actualizar libro",
                    "tags": tags,
                    "parameters": [id_parameter()],
                    "requestBody": json_body(payload),
                    "responses": {
                        "200": book_response("Libro actualizado"),
                        "404": error_response("Libro no encontrado")
                    }
                },
                "delete": {
                    "summary": "Eliminar libro permanentemente",
                    "tags": tags,
                    "parameters": [id_parameter()],
                    "responses": {
                        "204": { "description": "Libro eliminado" }
                    }
                }
            },
            "/{id}/desactivar": {
                "put": {
                    "summary": "Desactivar libro",
                    "tags": tags,
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": { "description": "Libro desactivado" },
                        "404": error_response("Libro no encontrado")
                    }
                }
            },
            "/{id}/stock": {
                "put": {
                    "summary": "Actualizar stock total",
                    "tags": tags,
                    "parameters": [id_parameter()],
                    "requestBody": json_body(json!({ "type": "integer", "format": "int32" })),
                    "responses": {
                        "200": book_response("Stock actualizado"),
                        "404": error_response("Libro no encontrado")
                    }
                }
            },
            "/{id}/actualizar-con-portada": {
                "put": {
                    "summary": "Actualizar libro con imagen de portada",
                    "tags": tags,
                    "parameters": [id_parameter()],
                    "requestBody": multipart_body("LibroFormActualizacion"),
                    "responses": {
                        "200": book_response("Libro actualizado"),
                        "400": error_response("Formulario inválido"),
                        "404": error_response("Libro no encontrado")
                    }
                }
            },
            "/buscar/codigo/{codigo}": {
                "get": {
                    "summary": "Buscar libro por código",
                    "tags": tags,
                    "parameters": [{
                        "name": "codigo",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" }
                    }],
                    "responses": {
                        "200": book_response("Libro encontrado"),
                        "404": error_response("Libro no encontrado")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Estado del módulo de libros",
                    "tags": tags,
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "CategoriaRef": {
                    "type": "object",
                    "properties": { "id": { "type": "integer", "format": "int64" } },
                    "required": ["id"]
                },
                "Libro": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "codigo": { "type": "string" },
                        "titulo": { "type": "string" },
                        "descripcion": { "type": "string", "nullable": true },
                        "autor": { "type": "string" },
                        "editorial": { "type": "string", "nullable": true },
                        "isbn": { "type": "string", "nullable": true },
                        "anioPublicacion": { "type": "integer", "format": "int32", "nullable": true },
                        "stockTotal": { "type": "integer", "format": "int32" },
                        "stockDisponible": { "type": "integer", "format": "int32" },
                        "estado": { "type": "boolean" },
                        "fechaCreacion": { "type": "string", "format": "date-time" },
                        "fechaActualizacion": { "type": "string", "format": "date-time" },
                        "categoria": { "$ref": "#/components/schemas/CategoriaRef" },
                        "portada": {
                            "type": "string",
                            "nullable": true,
                            "description": "Nombre del archivo de portada almacenado"
                        }
                    },
                    "required": [
                        "id", "codigo", "titulo", "autor", "stockTotal",
                        "stockDisponible", "estado", "fechaCreacion", "fechaActualizacion"
                    ]
                },
                "LibroPayload": {
                    "type": "object",
                    "properties": {
                        "codigo": { "type": "string" },
                        "titulo": { "type": "string" },
                        "descripcion": { "type": "string" },
                        "autor": { "type": "string" },
                        "editorial": { "type": "string" },
                        "isbn": { "type": "string" },
                        "anioPublicacion": { "type": "integer", "format": "int32" },
                        "stockTotal": { "type": "integer", "format": "int32", "default": 0 },
                        "stockDisponible": { "type": "integer", "format": "int32", "default": 0 },
                        "estado": { "type": "boolean", "default": true },
                        "categoria": { "$ref": "#/components/schemas/CategoriaRef" }
                    },
                    "required": ["codigo", "titulo", "autor"]
                },
                "LibroForm": form_schema(false),
                "LibroFormActualizacion": form_schema(true)
            }
        }
    })
}

fn form_schema(with_estado: bool) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "codigo": { "type": "string" },
            "titulo": { "type": "string" },
            "descripcion": { "type": "string" },
            "autor": { "type": "string" },
            "editorial": { "type": "string" },
            "isbn": { "type": "string" },
            "anioPublicacion": { "type": "integer" },
            "stockTotal": { "type": "integer" },
            "stockDisponible": { "type": "integer" },
            "categoriaId": { "type": "integer" },
            "portada": { "type": "string", "format": "binary" }
        },
        "required": ["codigo", "titulo", "autor", "stockTotal", "stockDisponible", "categoriaId"]
    });

    if with_estado {
        schema["properties"]["estado"] = json!({ "type": "boolean" });
        if let Some(required) = schema["required"].as_array_mut() {
            required.push(json!("estado"));
        }
    }
    schema
}
