//! # Authentication
//!
//! Sessions are rows in the database keyed by a random token carried in the
//! `edudoc_session` cookie. Handlers that need a logged-in user take a
//! [`CurrentUser`] argument; extraction fails with `401` before the handler
//! body runs.

pub mod password;

use crate::error::AppError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

pub const SESSION_COOKIE: &str = "edudoc_session";

/// The user behind the request's session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

fn resolve(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state missing".to_string()))?;
    let cookie = req.cookie(SESSION_COOKIE).ok_or(AppError::Unauthorized)?;
    let user = state
        .db
        .session_user(cookie.value())?
        .ok_or(AppError::Unauthorized)?;
    Ok(CurrentUser {
        id: user.id,
        username: user.username,
    })
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
