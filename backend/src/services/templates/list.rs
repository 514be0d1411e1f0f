use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SearchQuery;

/// Actix web handler for `GET /api/templates?q=`.
///
/// # Returns
/// - `200 OK` with the templates whose name contains `q` (all of them when
///   `q` is absent or blank), newest first.
pub async fn process(
    _user: CurrentUser,
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let templates = state.db.list_templates(query.term())?;
    Ok(HttpResponse::Ok().json(templates))
}
