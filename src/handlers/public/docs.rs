// handlers/public/docs.rs - GET /api-docs, OpenAPI 3.0 description of the route table

use axum::Json;
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

static OPENAPI: Lazy<Value> = Lazy::new(build_openapi);

/// GET /api-docs
pub async fn openapi_get() -> Json<Value> {
    Json(OPENAPI.clone())
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
    })
}

fn pokemon_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pokemon" } } }
    })
}

fn build_openapi() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Pokédex API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "REST API for managing a pokemon catalog"
        },
        "paths": paths(),
        "components": components()
    })
}

fn id_param() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": { "$ref": format!("#/components/schemas/{}", schema) } } }
    })
}

fn bearer() -> Value {
    json!([{ "bearerAuth": [] }])
}

fn unauthorized() -> Value {
    error_response("Missing, invalid or expired token")
}

fn too_large() -> Value {
    error_response("Request body exceeds the configured size limit")
}

fn paths() -> Value {
    let mut paths = Map::new();
    paths.insert("/api/pokemons".into(), collection_path());
    paths.insert("/api/pokemons/{id}".into(), record_path());
    paths.insert("/api/pokemons/{id}/favorite".into(), favorite_path());
    paths.insert("/api/login".into(), login_path());
    paths.insert("/api/register".into(), register_path());
    Value::Object(paths)
}

fn collection_path() -> Value {
    let list = json!({
        "type": "array",
        "items": { "$ref": "#/components/schemas/Pokemon" }
    });
    json!({
        "get": {
            "summary": "List every pokemon",
            "responses": {
                "200": {
                    "description": "All records ordered by id",
                    "content": { "application/json": { "schema": list } }
                },
                "500": error_response("Store error")
            }
        },
        "post": {
            "summary": "Create a pokemon",
            "security": bearer(),
            "requestBody": json_body("Pokemon"),
            "responses": {
                "201": pokemon_response("Created record"),
                "400": error_response("Validation errors, every violation listed"),
                "401": unauthorized(),
                "409": error_response("A pokemon with this id already exists"),
                "413": too_large(),
                "500": error_response("Store error")
            }
        }
    })
}

fn record_path() -> Value {
    let get = json!({
        "summary": "Get a pokemon by id",
        "parameters": [id_param()],
        "responses": {
            "200": pokemon_response("The record"),
            "400": error_response("Non-numeric id"),
            "404": error_response("No pokemon with this id"),
            "500": error_response("Store error")
        }
    });
    let put = json!({
        "summary": "Replace a pokemon",
        "security": bearer(),
        "parameters": [id_param()],
        "requestBody": json_body("Pokemon"),
        "responses": {
            "200": pokemon_response("Updated record"),
            "400": error_response("Validation errors, id mismatch or non-numeric id"),
            "401": unauthorized(),
            "404": error_response("No pokemon with this id"),
            "413": too_large(),
            "500": error_response("Store error")
        }
    });
    let delete = json!({
        "summary": "Delete a pokemon (idempotent)",
        "security": bearer(),
        "parameters": [id_param()],
        "responses": {
            "204": { "description": "Deleted or already absent" },
            "400": error_response("Non-numeric id"),
            "401": unauthorized(),
            "500": error_response("Store error")
        }
    });
    json!({ "get": get, "put": put, "delete": delete })
}

fn favorite_path() -> Value {
    json!({
        "patch": {
            "summary": "Toggle the favorite flag",
            "security": bearer(),
            "parameters": [id_param()],
            "responses": {
                "200": pokemon_response("Updated record"),
                "400": error_response("Non-numeric id"),
                "401": unauthorized(),
                "404": error_response("No pokemon with this id"),
                "500": error_response("Store error")
            }
        }
    })
}

fn login_path() -> Value {
    let token = json!({
        "type": "object",
        "properties": { "token": { "type": "string" } }
    });
    json!({
        "post": {
            "summary": "Exchange credentials for a one-hour bearer token",
            "requestBody": json_body("Credentials"),
            "responses": {
                "200": {
                    "description": "Signed token",
                    "content": { "application/json": { "schema": token } }
                },
                "400": error_response("Invalid credentials"),
                "500": error_response("Server error")
            }
        }
    })
}

fn register_path() -> Value {
    json!({
        "post": {
            "summary": "Register a new user",
            "requestBody": json_body("Credentials"),
            "responses": {
                "201": { "description": "User created" },
                "400": error_response("Username already exists or invalid body"),
                "500": error_response("Server error")
            }
        }
    })
}

fn components() -> Value {
    json!({
        "securitySchemes": {
            "bearerAuth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
        },
        "schemas": {
            "Pokemon": pokemon_schema(),
            "Credentials": credentials_schema(),
            "Error": error_schema()
        }
    })
}

fn pokemon_schema() -> Value {
    let name = json!({
        "type": "object",
        "required": ["english"],
        "properties": {
            "english": { "type": "string" },
            "french": { "type": "string" },
            "japanese": { "type": "string" }
        }
    });
    let base = json!({
        "type": "object",
        "required": ["HP", "Attack", "Defense", "Speed"],
        "properties": {
            "HP": { "type": "integer" },
            "Attack": { "type": "integer" },
            "Defense": { "type": "integer" },
            "Sp. Attack": { "type": "integer" },
            "Sp. Defense": { "type": "integer" },
            "Speed": { "type": "integer" }
        }
    });
    json!({
        "type": "object",
        "required": ["id", "name", "base"],
        "properties": {
            "id": { "type": "integer", "format": "int64" },
            "name": name,
            "type": { "type": "array", "items": { "type": "string" } },
            "base": base,
            "image": { "type": "string" },
            "isFavorite": { "type": "boolean", "default": false }
        }
    })
}

fn credentials_schema() -> Value {
    json!({
        "type": "object",
        "required": ["username", "password"],
        "properties": {
            "username": { "type": "string" },
            "password": { "type": "string", "format": "password" }
        }
    })
}

fn error_schema() -> Value {
    let violation = json!({
        "type": "object",
        "properties": {
            "field": { "type": "string" },
            "message": { "type": "string" }
        }
    });
    json!({
        "type": "object",
        "properties": {
            "error": { "type": "boolean" },
            "message": { "type": "string" },
            "code": { "type": "string" },
            "errors": { "type": "array", "items": violation }
        }
    })
}
