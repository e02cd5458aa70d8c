use super::engine::{ActivityRepository, StorageError, StorageResult, UpdateOutcome};
use crate::core::{ActivityStatus, ObjectId};
use crate::domain::{Activity, ActivityPatch};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Activity store kept entirely in process memory.
#[derive(Default)]
pub struct InMemoryActivityRepository {
    activities: RwLock<HashMap<ObjectId, Activity>>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, e.g. from a snapshot.
    pub fn with_activities(activities: impl IntoIterator<Item = Activity>) -> Self {
        let activities = activities
            .into_iter()
            .map(|activity| (activity.id, activity))
            .collect();
        Self {
            activities: RwLock::new(activities),
        }
    }

    /// Copy of every stored record, ordered by id.
    pub async fn dump(&self) -> Vec<Activity> {
        let activities = self.activities.read().await;
        let mut all: Vec<Activity> = activities.values().cloned().collect();
        all.sort_by_key(|activity| activity.id);
        all
    }

    /// Stores `activity` as is, replacing any record with the same id.
    pub(super) async fn put(&self, activity: Activity) {
        self.activities.write().await.insert(activity.id, activity);
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn insert(&self, activity: Activity) -> StorageResult<Activity> {
        let mut activities = self.activities.write().await;
        if activities.contains_key(&activity.id) {
            return Err(StorageError::Duplicate(activity.id));
        }
        activities.insert(activity.id, activity.clone());
        Ok(activity)
    }

    async fn find_by_id(&self, id: &ObjectId) -> StorageResult<Option<Activity>> {
        let activities = self.activities.read().await;
        Ok(activities.get(id).cloned())
    }

    async fn update_if_status(
        &self,
        id: &ObjectId,
        expected: ActivityStatus,
        patch: ActivityPatch,
    ) -> StorageResult<UpdateOutcome> {
        let mut activities = self.activities.write().await;
        let Some(activity) = activities.get_mut(id) else {
            return Ok(UpdateOutcome::Missing);
        };
        if activity.status != expected {
            return Ok(UpdateOutcome::Conflict(activity.clone()));
        }
        activity.apply(&patch);
        Ok(UpdateOutcome::Updated(activity.clone()))
    }

    async fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Activity>> {
        let activities = self.activities.read().await;
        let mut owned: Vec<Activity> = activities
            .values()
            .filter(|activity| activity.is_owned_by(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn count(&self) -> StorageResult<usize> {
        Ok(self.activities.read().await.len())
    }
}
