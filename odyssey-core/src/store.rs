//! Journey persistence.
//!
//! The store keeps one full record per journey, keyed by id, with upsert
//! semantics: writes are idempotent full-record replacements, so overlapping
//! writes for the same id simply settle last-write-wins. The production
//! implementation is a directory of JSON documents; tests use the in-memory
//! store from [`crate::testing`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::model::SavedJourney;

/// Maximum number of journeys returned by a listing.
pub const PAGE_SIZE: usize = 20;

/// Bound on lazy backing-directory creation before giving up.
const INIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store initialization timed out")]
    InitTimeout,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable journey persistence, one record per id.
#[async_trait]
pub trait JourneyStore: Send + Sync {
    /// Insert or fully replace the record with this journey's id.
    async fn upsert(&self, journey: &SavedJourney) -> Result<(), StoreError>;

    /// All stored journeys, most recently updated first, bounded to
    /// [`PAGE_SIZE`]. An empty store is an empty list, not an error.
    async fn get_all(&self) -> Result<Vec<SavedJourney>, StoreError>;

    /// The journey with this id, if present.
    async fn get_by_id(&self, id: &str) -> Result<Option<SavedJourney>, StoreError>;

    /// Remove the record with this id. Removing an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// File-backed store: one JSON document per journey under a base directory.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on first use.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path of the record file for an id.
    fn journey_path(&self, id: &str) -> PathBuf {
        let sanitized: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{sanitized}.json"))
    }

    /// Create the backing directory if absent, bounded by [`INIT_TIMEOUT`].
    async fn ensure_dir(&self) -> Result<(), StoreError> {
        match tokio::time::timeout(INIT_TIMEOUT, fs::create_dir_all(&self.base_dir)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(StoreError::InitTimeout),
        }
    }
}

#[async_trait]
impl JourneyStore for FileStore {
    async fn upsert(&self, journey: &SavedJourney) -> Result<(), StoreError> {
        self.ensure_dir().await?;
        let content = serde_json::to_string_pretty(journey)?;
        fs::write(self.journey_path(&journey.id), content).await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<SavedJourney>, StoreError> {
        // A store that could not be initialized reads as empty rather than
        // failing the caller.
        if let Err(e) = self.ensure_dir().await {
            warn!(error = %e, "journey store init failed; listing as empty");
            return Ok(Vec::new());
        }

        let mut journeys = Vec::new();
        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match read_journey(&path).await {
                    Ok(journey) => journeys.push(journey),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable journey record");
                    }
                }
            }
        }

        journeys.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        journeys.truncate(PAGE_SIZE);
        Ok(journeys)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<SavedJourney>, StoreError> {
        match fs::read_to_string(self.journey_path(id)).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.journey_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

async fn read_journey(path: &Path) -> Result<SavedJourney, StoreError> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Device-local marker recording the last active journey id.
///
/// Lives outside the record directory; read at the single default-resume
/// point, written when a journey is created or resumed, cleared when the
/// active journey is deleted without a replacement.
pub struct LastJourneyMarker {
    path: PathBuf,
}

impl LastJourneyMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The recorded id, if any. Read failures degrade to no-marker.
    pub async fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let id = content.trim();
                (!id.is_empty()).then(|| id.to_string())
            }
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!(error = %e, "could not read last-journey marker");
                }
                None
            }
        }
    }

    /// Record an id as the last active journey.
    pub async fn write(&self, id: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, id).await?;
        Ok(())
    }

    /// Forget the last active journey.
    pub async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
