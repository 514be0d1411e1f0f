use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn process(
    _user: CurrentUser,
    state: web::Data<AppState>,
    document_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let document = state
        .db
        .get_document(document_id.into_inner())?
        .ok_or(AppError::NotFound("document"))?;
    Ok(HttpResponse::Ok().json(document))
}
