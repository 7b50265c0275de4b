//! Shared application state injected into every handler as `web::Data<AppState>`.

use crate::config::Config;
use crate::store::UniformStore;
use crate::uploads::UploadDir;

/// Built once in `main` and cloned (as an `Arc`) into each worker, so every
/// worker serializes writes through the same store lock.
#[derive(Debug)]
pub struct AppState {
    pub store: UniformStore,
    pub uploads: UploadDir,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        AppState {
            store: UniformStore::new(&config.data_file),
            uploads: UploadDir::new(&config.uploads_dir, config.max_upload_bytes),
        }
    }
}
