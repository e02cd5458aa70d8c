//! JSON snapshot persistence for the activity store
//!
//! Every mutation rewrites the whole snapshot. The file is first written to a
//! temporary sibling and then renamed over the target, so readers never see a
//! half-written snapshot. Memory is only changed once the file is in place.

use super::engine::{ActivityRepository, StorageError, StorageResult, UpdateOutcome};
use super::memory::InMemoryActivityRepository;
use crate::core::{ActivityStatus, ObjectId};
use crate::domain::{Activity, ActivityPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub version: u32,
    pub activities: Vec<Activity>,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub created_at: DateTime<Utc>,
    pub activity_count: usize,
}

impl ActivitySnapshot {
    pub fn new(activities: Vec<Activity>) -> Self {
        let activity_count = activities.len();
        Self {
            version: SNAPSHOT_VERSION,
            activities,
            metadata: SnapshotMetadata {
                created_at: Utc::now(),
                activity_count,
            },
        }
    }

    pub fn load(path: &Path) -> StorageResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = serde_json::from_reader(reader)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(Some(snapshot))
    }

    pub fn write_atomic(&self, path: &Path) -> StorageResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| StorageError::Io(err.error))?;
        Ok(())
    }
}

/// Activity store backed by memory and mirrored to a JSON snapshot file.
pub struct SnapshotActivityRepository {
    inner: InMemoryActivityRepository,
    path: PathBuf,
    // Serializes mutate+flush so snapshots land in mutation order.
    write_lock: Mutex<()>,
}

impl SnapshotActivityRepository {
    /// Opens the store at `path`, loading an existing snapshot if present.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let activities = match ActivitySnapshot::load(&path)? {
            Some(snapshot) => {
                info!(
                    path = %path.display(),
                    activities = snapshot.activities.len(),
                    "loaded activity snapshot"
                );
                snapshot.activities
            }
            None => Vec::new(),
        };

        Ok(Self {
            inner: InMemoryActivityRepository::with_activities(activities),
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the stored records with `staged` in place of (or added next to)
    /// its stored version. Caller holds `write_lock` and commits `staged` to
    /// memory only after this succeeds.
    async fn flush_with(&self, staged: &Activity) -> StorageResult<()> {
        let mut activities = self.inner.dump().await;
        match activities.iter_mut().find(|activity| activity.id == staged.id) {
            Some(slot) => *slot = staged.clone(),
            None => activities.push(staged.clone()),
        }

        let snapshot = ActivitySnapshot::new(activities);
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || snapshot.write_atomic(&path))
            .await
            .map_err(|err| StorageError::Io(std::io::Error::other(err)))??;
        debug!(path = %self.path.display(), "activity snapshot written");
        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for SnapshotActivityRepository {
    async fn insert(&self, activity: Activity) -> StorageResult<Activity> {
        let _guard = self.write_lock.lock().await;
        if self.inner.find_by_id(&activity.id).await?.is_some() {
            return Err(StorageError::Duplicate(activity.id));
        }
        self.flush_with(&activity).await?;
        self.inner.put(activity.clone()).await;
        Ok(activity)
    }

    async fn find_by_id(&self, id: &ObjectId) -> StorageResult<Option<Activity>> {
        self.inner.find_by_id(id).await
    }

    async fn update_if_status(
        &self,
        id: &ObjectId,
        expected: ActivityStatus,
        patch: ActivityPatch,
    ) -> StorageResult<UpdateOutcome> {
        let _guard = self.write_lock.lock().await;
        let Some(mut activity) = self.inner.find_by_id(id).await? else {
            return Ok(UpdateOutcome::Missing);
        };
        if activity.status != expected {
            return Ok(UpdateOutcome::Conflict(activity));
        }
        if activity.apply(&patch) {
            self.flush_with(&activity).await?;
            self.inner.put(activity.clone()).await;
        }
        Ok(UpdateOutcome::Updated(activity))
    }

    async fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Activity>> {
        self.inner.list_by_owner(owner_id).await
    }

    async fn count(&self) -> StorageResult<usize> {
        self.inner.count().await
    }
}
