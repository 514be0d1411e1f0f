//! Public overview routes: the dashboard summary and the health probe.

use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::dashboard::Dashboard;

/// `GET /api/dashboard`: all templates with the generated-document counters.
pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(Dashboard {
        templates: state.db.list_templates(None)?,
        generated_count: state.db.count_documents()?,
        today_count: state.db.count_documents_today()?,
    }))
}

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("OK")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/api/dashboard", web::get().to(index));
}
