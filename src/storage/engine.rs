use crate::core::{ActivityStatus, ObjectId};
use crate::domain::{Activity, ActivityPatch};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Activity '{0}' already exists")]
    Duplicate(ObjectId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result of a conditional update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The patch was applied. Holds the stored record.
    Updated(Activity),
    /// The stored status no longer matched. Holds the current record, untouched.
    Conflict(Activity),
    /// No activity with this id.
    Missing,
}

/// Activity store - allows pluggable storage backends
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Insert a new activity. Fails if the id is already taken.
    async fn insert(&self, activity: Activity) -> StorageResult<Activity>;

    /// Look up an activity by id
    async fn find_by_id(&self, id: &ObjectId) -> StorageResult<Option<Activity>>;

    /// Apply `patch` to the activity with `id`, but only while its stored
    /// status still equals `expected`. The check and the write happen under
    /// the same lock.
    async fn update_if_status(
        &self,
        id: &ObjectId,
        expected: ActivityStatus,
        patch: ActivityPatch,
    ) -> StorageResult<UpdateOutcome>;

    /// All activities owned by `owner_id`, oldest first
    async fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Activity>>;

    /// Total number of stored activities
    async fn count(&self) -> StorageResult<usize>;
}
