//! Routes under `/api/auth`. Login sets the session cookie, logout clears it.

mod login;
mod logout;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/login", post().to(login::process))
        .route("/logout", post().to(logout::process))
}
