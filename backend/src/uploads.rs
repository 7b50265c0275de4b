//! Image files on local disk, published under `/uploads`.

use crate::store::unix_millis;
use futures_util::{Stream, StreamExt};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PUBLIC_PREFIX: &str = "/uploads/";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to write upload {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read upload body: {0}")]
    Body(String),
}

/// A file written during the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub file_name: String,
}

impl StoredUpload {
    pub fn public_path(&self) -> String {
        format!("{}{}", PUBLIC_PREFIX, self.file_name)
    }
}

#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        UploadDir {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Streams `body` into a fresh file named `<unix millis><.ext>`.
    ///
    /// A partially written file is removed if the body fails or grows past the limit.
    pub async fn save<S, B, E>(&self, original_name: &str, mut body: S) -> Result<StoredUpload, UploadError>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        let (file_name, mut file) = self.create_unique(extension_of(original_name))?;
        let path = self.root.join(&file_name);

        let mut written = 0usize;
        let outcome = async {
            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(|e| UploadError::Body(e.to_string()))?;
                let chunk = chunk.as_ref();
                written += chunk.len();
                if written > self.max_bytes {
                    return Err(UploadError::TooLarge {
                        limit: self.max_bytes,
                    });
                }
                file.write_all(chunk).map_err(|source| UploadError::Io {
                    path: path.clone(),
                    source,
                })?;
            }
            file.flush().map_err(|source| UploadError::Io {
                path: path.clone(),
                source,
            })
        }
        .await;

        match outcome {
            Ok(()) => Ok(StoredUpload { file_name }),
            Err(e) => {
                drop(file);
                let _ = std::fs::remove_file(&path);
                Err(e)
            }
        }
    }

    fn create_unique(&self, ext: String) -> Result<(String, File), UploadError> {
        let mut stamp = unix_millis();
        loop {
            let file_name = format!("{}{}", stamp, ext);
            let path = self.root.join(&file_name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((file_name, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => stamp += 1,
                Err(source) => return Err(UploadError::Io { path, source }),
            }
        }
    }

    /// Deletes the file behind a public `/uploads/...` path, if it is one of ours.
    pub fn remove(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            log::warn!("refusing to remove non-upload path {public_path:?}");
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => log::info!("Removed upload {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("failed to remove upload {}: {}", path.display(), e),
        }
    }

    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path.strip_prefix(PUBLIC_PREFIX)?;
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        valid.then(|| self.root.join(name))
    }
}

/// `.ext` of the client file name, mirroring how uploads were named historically.
/// Non-alphanumeric extensions are dropped rather than written to disk.
fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
