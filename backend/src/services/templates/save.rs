use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::template::TemplateDraft;
use log::info;

fn validate(draft: &TemplateDraft) -> Result<(), AppError> {
    draft
        .validate()
        .map_err(|fields| AppError::BadRequest(format!("required: {}", fields.join(", "))))
}

/// `POST /api/templates`: stores a new template and answers `201 Created`.
pub async fn create(
    user: CurrentUser,
    state: web::Data<AppState>,
    payload: web::Json<TemplateDraft>,
) -> Result<HttpResponse, AppError> {
    validate(&payload)?;
    let template = state.db.create_template(&payload)?;
    info!("{} created template {} ({})", user.username, template.id, template.name);
    Ok(HttpResponse::Created().json(template))
}

/// `PUT /api/templates/{template_id}`: replaces name, description and body.
pub async fn update(
    user: CurrentUser,
    state: web::Data<AppState>,
    template_id: web::Path<i64>,
    payload: web::Json<TemplateDraft>,
) -> Result<HttpResponse, AppError> {
    validate(&payload)?;
    let template = state
        .db
        .update_template(template_id.into_inner(), &payload)?
        .ok_or(AppError::NotFound("template"))?;
    info!("{} updated template {}", user.username, template.id);
    Ok(HttpResponse::Ok().json(template))
}
