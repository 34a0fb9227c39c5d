//! Snapshot producer backed by the poller's JSON output
//!
//! The INA219 poller owns the bus and the battery estimates; it writes one
//! JSON object per poll. This coordinator only loads that object and
//! publishes it as the new snapshot.

use crate::snapshot::{self, Snapshot, SnapshotPublisher, SnapshotReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("reading snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct FileCoordinator {
    path: PathBuf,
    publisher: SnapshotPublisher,
    last_update_success: AtomicBool,
}

impl FileCoordinator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (publisher, _reader) = snapshot::channel();
        Self {
            path: path.into(),
            publisher,
            last_update_success: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reader(&self) -> SnapshotReader {
        self.publisher.subscribe()
    }

    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::Relaxed)
    }

    /// Load the poller output and publish it. On failure the previous
    /// snapshot stays in place, flagged unavailable.
    pub async fn refresh(&self) -> Result<(), CoordinatorError> {
        let result = self.load().await;
        self.last_update_success
            .store(result.is_ok(), Ordering::Relaxed);

        match result {
            Ok(snapshot) => {
                tracing::debug!("Loaded {} fields from {:?}", snapshot.len(), self.path);
                self.publisher.publish(snapshot);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Snapshot refresh failed, keeping previous readings: {}", e);
                self.publisher.mark_unavailable();
                Err(e)
            }
        }
    }

    async fn load(&self) -> Result<Snapshot, CoordinatorError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CoordinatorError::Io {
                path: self.path.clone(),
                source,
            })?;
        serde_json::from_str(&contents).map_err(|source| CoordinatorError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
