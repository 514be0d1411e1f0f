use crate::auth::password::verify_password;
use crate::auth::SESSION_COOKIE;
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::SESSION_TTL_HOURS;
use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use common::requests::LoginRequest;
use log::{info, warn};
use serde_json::json;

/// Actix web handler for `POST /api/auth/login`.
///
/// # Returns
/// - `200 OK` with the username, and an HttpOnly session cookie that lives
///   as long as the server-side session.
/// - `401 Unauthorized` for an unknown user or a wrong password. Both cases
///   answer the same way.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = match state.db.find_user(payload.username.trim())? {
        Some(user) if verify_password(&payload.password, &user.password_hash) => user,
        _ => {
            warn!("Failed login for `{}`", payload.username);
            return Err(AppError::InvalidCredentials);
        }
    };

    let token = state.db.create_session(user.id)?;
    info!("{} logged in", user.username);

    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(SESSION_TTL_HOURS))
        .finish();
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "username": user.username })))
}
