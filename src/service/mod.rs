//! Activity lifecycle manager.
//!
//! Loads an activity, checks ownership, applies a lifecycle transition and
//! persists the result. Activities owned by someone else are reported as not
//! found so their existence does not leak.
//!
//! Reads (`get`, `list`) treat deleted activities as absent. Transitions still
//! see them, so acting on a deleted activity is refused rather than not found.

use crate::core::{ActivityError, ActivityStatus, ObjectId, Result};
use crate::domain::{
    Activity, ActivityPatch, ActivityView, DESCRIPTION_MAX_LEN, NAME_MAX_LEN, NewActivity,
    Transition, TransitionOutcome,
};
use crate::storage::{ActivityRepository, UpdateOutcome};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct ActivityService {
    repo: Arc<dyn ActivityRepository>,
}

impl ActivityService {
    pub fn new(repo: Arc<dyn ActivityRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<dyn ActivityRepository> {
        &self.repo
    }

    pub async fn create(&self, user_id: &str, draft: NewActivity) -> Result<ActivityView> {
        validate_draft(&draft)?;
        let activity = self.repo.insert(Activity::new(user_id, draft)).await?;
        info!(activity_id = %activity.id, owner = user_id, "activity created");
        Ok(activity.into())
    }

    pub async fn get(&self, user_id: &str, id: &ObjectId) -> Result<ActivityView> {
        let activity = self.load_owned(user_id, id).await?;
        if activity.status == ActivityStatus::Deleted {
            return Err(ActivityError::activity_not_found());
        }
        Ok(activity.into())
    }

    /// Live activities of `user_id`; deleted ones are left out.
    pub async fn list(&self, user_id: &str) -> Result<Vec<ActivityView>> {
        let activities = self.repo.list_by_owner(user_id).await?;
        Ok(activities
            .into_iter()
            .filter(|activity| activity.status != ActivityStatus::Deleted)
            .map(ActivityView::from)
            .collect())
    }

    pub async fn complete(&self, user_id: &str, id: &ObjectId) -> Result<ActivityView> {
        self.transition(user_id, id, Transition::Complete).await
    }

    /// Moves a completed activity to `archived`. Archiving an archived
    /// activity succeeds without touching the store.
    pub async fn archive(&self, user_id: &str, id: &ObjectId) -> Result<ActivityView> {
        self.transition(user_id, id, Transition::Archive).await
    }

    pub async fn delete(&self, user_id: &str, id: &ObjectId) -> Result<ActivityView> {
        self.transition(user_id, id, Transition::Delete).await
    }

    async fn transition(
        &self,
        user_id: &str,
        id: &ObjectId,
        transition: Transition,
    ) -> Result<ActivityView> {
        let mut current = self.load_owned(user_id, id).await?;

        // Every transition moves forward through the lifecycle, so a conflict
        // can only recur a bounded number of times.
        loop {
            let from = current.status;
            let to = match transition.apply(from) {
                Ok(TransitionOutcome::Changed(to)) => to,
                Ok(TransitionOutcome::Unchanged) => {
                    debug!(activity_id = %id, status = %from, %transition, "transition is a no-op");
                    return Ok(current.into());
                }
                Err(err) => {
                    warn!(activity_id = %id, status = %from, %transition, "transition refused");
                    return Err(err);
                }
            };

            match self
                .repo
                .update_if_status(id, from, ActivityPatch::status(to))
                .await?
            {
                UpdateOutcome::Updated(updated) => {
                    info!(activity_id = %id, from = %from, to = %to, %transition, "activity transitioned");
                    return Ok(updated.into());
                }
                UpdateOutcome::Conflict(latest) => {
                    debug!(
                        activity_id = %id,
                        expected = %from,
                        found = %latest.status,
                        %transition,
                        "activity changed concurrently, re-checking"
                    );
                    current = latest;
                }
                UpdateOutcome::Missing => return Err(ActivityError::activity_not_found()),
            }
        }
    }

    async fn load_owned(&self, user_id: &str, id: &ObjectId) -> Result<Activity> {
        match self.repo.find_by_id(id).await? {
            Some(activity) if activity.is_owned_by(user_id) => Ok(activity),
            Some(_) => {
                debug!(activity_id = %id, user_id, "activity belongs to another user");
                Err(ActivityError::activity_not_found())
            }
            None => Err(ActivityError::activity_not_found()),
        }
    }
}

fn validate_draft(draft: &NewActivity) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(ActivityError::invalid("name must not be blank"));
    }
    if draft.name.len() > NAME_MAX_LEN {
        return Err(ActivityError::invalid(format!(
            "name must be at most {NAME_MAX_LEN} characters"
        )));
    }
    if draft.description.len() > DESCRIPTION_MAX_LEN {
        return Err(ActivityError::invalid(format!(
            "description must be at most {DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(())
}
