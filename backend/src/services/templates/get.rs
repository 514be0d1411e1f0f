use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Actix web handler for `GET /api/templates/{template_id}`.
///
/// # Returns
/// - `200 OK` with the `DocumentTemplate` as JSON.
/// - `404 Not Found` when no template has this id.
pub async fn process(
    _user: CurrentUser,
    state: web::Data<AppState>,
    template_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let template = state
        .db
        .get_template(template_id.into_inner())?
        .ok_or(AppError::NotFound("template"))?;
    Ok(HttpResponse::Ok().json(template))
}
