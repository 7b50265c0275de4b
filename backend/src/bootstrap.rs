//! Prepares the on-disk layout before the server starts accepting requests.

use crate::config::Config;
use log::info;
use std::fs;
use std::io;

/// Creates the uploads directory, the data directory and an empty `[]` data
/// file when they do not exist yet. Existing data is never touched.
pub fn ensure_layout(config: &Config) -> io::Result<()> {
    fs::create_dir_all(&config.uploads_dir)?;
    if let Some(parent) = config.data_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    if !config.data_file.exists() {
        fs::write(&config.data_file, "[]")?;
        info!("Created empty uniform list at {}", config.data_file.display());
    }
    Ok(())
}
