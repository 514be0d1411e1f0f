//! EduDoc backend: stores document templates, fills them with submitted
//! values and renders the result to PDF.

pub mod auth;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod state;
pub mod storage;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::pipeline::compositor::load_logo;
use crate::pipeline::fonts::resolve_fonts;
use crate::pipeline::DocumentPipeline;
use crate::state::AppState;
use crate::storage::{seed, Database, FileStore, SeedError};
use actix_web::web;
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

const JSON_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot prepare directories: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open database: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("cannot seed database: {0}")]
    Seed(#[from] SeedError),
    #[error("cannot load fonts: {0}")]
    Fonts(#[from] pipeline::fonts::FontError),
}

/// Opens storage, seeds it and prepares the document pipeline.
pub fn build_state(config: AppConfig) -> Result<AppState, StartupError> {
    config.ensure_dirs()?;
    let db = Database::open(config.database_path())?;
    seed(&db, &config.admin)?;
    let files = FileStore::open(config.uploads_dir())?;

    let fonts = resolve_fonts(&config.fonts)?;
    let logo = load_logo(config.logo.as_deref());
    let pipeline = DocumentPipeline::new(config.layout.clone(), fonts, logo);
    let compositor = pipeline.compositor();
    if compositor.used_fallback_font() {
        warn!("Documents will use the built-in font");
    }
    info!(
        "Pages {}x{} mm, logo {}",
        compositor.settings().page_width_mm,
        compositor.settings().page_height_mm,
        if compositor.has_logo() { "enabled" } else { "disabled" }
    );

    Ok(AppState {
        config: Arc::new(config),
        db,
        files,
        pipeline: Arc::new(pipeline),
    })
}

/// Registers every route and the JSON body settings.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    services::dashboard::configure(cfg);
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT)
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(services::auth::configure_routes())
    .service(services::templates::configure_routes())
    .service(services::generated::configure_routes());
}
