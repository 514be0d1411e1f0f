use crate::config::AppConfig;
use crate::pipeline::DocumentPipeline;
use crate::storage::{Database, FileStore};
use std::sync::Arc;

/// Shared application state, injected as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub files: FileStore,
    pub pipeline: Arc<DocumentPipeline>,
}
