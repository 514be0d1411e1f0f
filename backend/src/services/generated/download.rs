use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::Folder;
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web;

/// Actix web handler for `GET /api/generated/{document_id}/download`.
///
/// # Returns
/// - `200 OK` streaming the stored PDF as an attachment.
/// - `404 Not Found` when the record or its file is gone.
pub async fn process(
    _user: CurrentUser,
    state: web::Data<AppState>,
    document_id: web::Path<i64>,
) -> Result<NamedFile, AppError> {
    let document = state
        .db
        .get_document(document_id.into_inner())?
        .ok_or(AppError::NotFound("document"))?;
    if !state.files.exists(Folder::Pdfs, &document.filename) {
        return Err(AppError::NotFound("file"));
    }

    let file = NamedFile::open(state.files.path(Folder::Pdfs, &document.filename)?)?;
    Ok(file
        .set_content_type(mime_guess::mime::APPLICATION_PDF)
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.filename)],
        }))
}
