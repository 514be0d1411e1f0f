//! # Storage
//!
//! Persistence for templates, generated documents, users and sessions in a
//! single SQLite file, plus the on-disk store for uploaded signatures and
//! produced PDFs.
//!
//! A fresh `rusqlite::Connection` is opened for every operation, so a
//! [`Database`] is just the path to the file and is cheap to clone into each
//! worker.

mod database;
mod documents;
mod files;
mod seed;
mod sessions;
mod templates;
mod users;

pub use database::Database;
pub use files::{FileStore, Folder};
pub use seed::{seed, SeedError};
pub use sessions::SESSION_TTL_HOURS;
pub use users::User;
