pub mod auth;
pub mod dashboard;
pub mod generated;
pub mod templates;
