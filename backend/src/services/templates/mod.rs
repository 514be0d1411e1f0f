//! # Template Service Module
//!
//! Routes under `/api/templates`. Every handler requires a session.
//!
//! ## Sub-modules:
//! - `list`: lists templates, optionally filtered by name.
//! - `get`: returns one template.
//! - `save`: creates and updates templates from a `TemplateDraft` payload.
//! - `delete`: removes a template, its generated-document records and their PDFs.
//! - `variables`: the placeholders of a template in prompting order.
//! - `generate`: fills a template from a multipart form and returns the PDF.

mod delete;
mod generate;
mod get;
mod list;
mod save;
mod variables;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`** (`?q=`): `list::process`, newest first.
/// *   **`POST /`**: `save::create`, answers `201 Created`.
/// *   **`GET /{template_id}`**: `get::process`.
/// *   **`PUT /{template_id}`**: `save::update`.
/// *   **`DELETE /{template_id}`**: `delete::process`.
/// *   **`GET /{template_id}/variables`**: `variables::process`.
/// *   **`POST /{template_id}/generate`**: `generate::process`. Expects one text
///     field per variable and an optional `signature` file; answers with the
///     PDF as an attachment.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(save::create))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", put().to(save::update))
        .route("/{template_id}", delete().to(delete::process))
        .route("/{template_id}/variables", get().to(variables::process))
        .route("/{template_id}/generate", post().to(generate::process))
}
