use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::Folder;
use actix_web::{web, HttpResponse};
use log::info;

/// Actix web handler for `DELETE /api/generated/{document_id}`.
///
/// The stored PDF is removed first when it still exists, then the record.
pub async fn process(
    user: CurrentUser,
    state: web::Data<AppState>,
    document_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let document = state
        .db
        .get_document(document_id.into_inner())?
        .ok_or(AppError::NotFound("document"))?;
    state.files.delete(Folder::Pdfs, &document.filename)?;
    state.db.delete_document(document.id)?;
    info!("{} deleted generated document {}", user.username, document.id);
    Ok(HttpResponse::NoContent().finish())
}
