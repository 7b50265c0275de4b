//! Runtime configuration read from environment variables.

use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_FILE: &str = "data/uniforms.json";
const DEFAULT_UPLOADS_DIR: &str = "uploads";
const DEFAULT_ALLOWED_ORIGINS: &str = "https://uniform-pal.vercel.app,https://localhost:5173";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10 MB

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("ALLOWED_ORIGINS must list explicit origins, not '*'")]
    WildcardOrigin,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON array file holding every uniform record.
    pub data_file: PathBuf,
    /// Directory uploaded images are written to and served from.
    pub uploads_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                expected: "port number",
                value,
            })?,
            None => DEFAULT_PORT,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "MAX_UPLOAD_BYTES",
                expected: "byte count",
                value,
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        let data_file = lookup("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        let uploads_dir = lookup("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR));
        let origins = lookup("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());

        Ok(Config {
            host,
            port,
            data_file,
            uploads_dir,
            allowed_origins: parse_origins(&origins)?,
            max_upload_bytes,
        })
    }
}

/// Splits a comma-separated origin list. Browsers send origins without a
/// trailing slash, so one is stripped here or it would never match.
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut origins = Vec::new();
    for origin in raw.split(',') {
        let origin = origin.trim().trim_end_matches('/');
        if origin.is_empty() {
            continue;
        }
        if origin == "*" {
            return Err(ConfigError::WildcardOrigin);
        }
        origins.push(origin.to_string());
    }
    Ok(origins)
}
