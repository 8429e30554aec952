//! OpenAPI documents as the codec sees them: opaque JSON values.

use crate::error::{Result, ShareLinkError};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// An OpenAPI document. Its structure is never inspected.
pub type Document = Value;

/// File name offered when exporting a document.
pub const DEFAULT_EXPORT_NAME: &str = "openapi.json";

/// Pet Store example shown when no shared document is available.
pub fn example_document() -> Document {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Pet Store API",
            "version": "1.0.0",
            "description": "A simple pet store API example"
        },
        "servers": [{ "url": "https://api.petstore.com/v1" }],
        "paths": {
            "/pets": {
                "get": {
                    "summary": "List all pets",
                    "operationId": "listPets",
                    "responses": {
                        "200": {
                            "description": "A list of pets",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Pet" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "name": { "type": "string" },
                        "status": { "type": "string", "enum": ["available", "pending", "sold"] }
                    }
                }
            }
        }
    })
}

/// Parse user-supplied JSON text, whether typed in or read from a file.
pub fn parse_document(text: &str) -> Result<Document> {
    serde_json::from_str(text).map_err(|e| ShareLinkError::MalformedJson(e.to_string()))
}

/// Pretty-print with two-space indentation.
pub fn to_pretty(document: &Document) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|e| ShareLinkError::Encode(e.to_string()))
}

/// Read and validate a JSON document from disk.
pub fn import_file(path: impl AsRef<Path>) -> Result<Document> {
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

/// Write a document to disk as pretty-printed JSON.
pub fn export_file(path: impl AsRef<Path>, document: &Document) -> Result<()> {
    let mut text = to_pretty(document)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}
