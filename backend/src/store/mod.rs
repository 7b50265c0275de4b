//! Durable, ordered collection of uniform records backed by one JSON file.
//!
//! There is no cache: every call reads the whole file, and every mutation
//! rewrites it. Mutations run under a single async mutex so that two
//! read-modify-write cycles can never interleave and drop each other's change.

mod id;

use common::model::uniform::Uniform;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;

pub use id::{next_id, unix_millis};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} does not contain a valid uniform list", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode uniform list")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug)]
pub struct UniformStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl UniformStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        UniformStore {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    /// Reads and parses the whole backing file.
    pub fn load_all(&self) -> Result<Vec<Uniform>, StoreError> {
        let bytes = std::fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the backing file with `records`.
    ///
    /// The list is written to a temporary file next to the target and renamed
    /// over it, so readers see either the old or the new list.
    pub fn save_all(&self, records: &[Uniform]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records).map_err(StoreError::Encode)?;
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Runs one serialized read-modify-write cycle.
    ///
    /// `apply` receives the current list. The list is written back only when
    /// `apply` returns `Ok`; its own error is handed back in the inner result so
    /// callers can tell a rejected change from a failing store.
    pub async fn modify<T, E>(
        &self,
        apply: impl FnOnce(&mut Vec<Uniform>) -> Result<T, E>,
    ) -> Result<Result<T, E>, StoreError> {
        let _guard = self.writer.lock().await;
        let mut records = self.load_all()?;
        match apply(&mut records) {
            Ok(out) => {
                self.save_all(&records)?;
                Ok(Ok(out))
            }
            Err(e) => Ok(Err(e)),
        }
    }
}
