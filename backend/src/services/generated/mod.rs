//! # Generated Document Service Module
//!
//! Routes under `/api/generated` for browsing, downloading and deleting the
//! audit records of generated documents. Every handler requires a session.

mod delete;
mod download;
mod get;
mod list;

use actix_web::web::{delete, get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/generated";

/// Configures and returns the Actix `Scope` for generated-document routes.
///
/// # Registered Routes:
///
/// *   **`GET /`** (`?q=`): records whose template name contains `q`, newest first.
/// *   **`GET /{document_id}`**: one record with its submitted values.
/// *   **`GET /{document_id}/download`**: the stored PDF as an attachment.
/// *   **`DELETE /{document_id}`**: removes the PDF (if present) and the record.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/{document_id}", get().to(get::process))
        .route("/{document_id}", delete().to(delete::process))
        .route("/{document_id}/download", get().to(download::process))
}
