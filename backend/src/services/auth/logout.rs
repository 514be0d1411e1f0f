use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse};

/// Actix web handler for `POST /api/auth/logout`.
///
/// Deletes the session named by the cookie, if any, and tells the browser to
/// drop the cookie. Always answers `204 No Content`.
pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.db.delete_session(cookie.value())?;
    }

    let mut expired = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    expired.make_removal();
    Ok(HttpResponse::NoContent().cookie(expired).finish())
}
