use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SearchQuery;

pub async fn process(
    _user: CurrentUser,
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let documents = state.db.list_documents(query.term())?;
    Ok(HttpResponse::Ok().json(documents))
}
