use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::Folder;
use actix_web::{web, HttpResponse};
use log::info;

/// Actix web handler for `DELETE /api/templates/{template_id}`.
///
/// Records generated from the template are deleted with it. Their PDF files
/// are removed best effort; a file that cannot be removed does not fail the
/// request.
pub async fn process(
    user: CurrentUser,
    state: web::Data<AppState>,
    template_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let template_id = template_id.into_inner();
    let filenames = state
        .db
        .delete_template(template_id)?
        .ok_or(AppError::NotFound("template"))?;
    for name in &filenames {
        state.files.discard(Folder::Pdfs, name);
    }
    info!(
        "{} deleted template {} and {} generated document(s)",
        user.username,
        template_id,
        filenames.len()
    );
    Ok(HttpResponse::NoContent().finish())
}
