use crate::core::{ActivityStatus, ObjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for activity names.
pub const NAME_MAX_LEN: usize = 200;
/// Upper bound for activity descriptions.
pub const DESCRIPTION_MAX_LEN: usize = 5000;

/// A stored activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub status: ActivityStatus,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Builds a fresh `open` activity for `owner_id`.
    pub fn new(owner_id: impl Into<String>, draft: NewActivity) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: draft.name.trim().to_string(),
            description: draft.description,
            status: ActivityStatus::Open,
            owner_id: owner_id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    /// Applies `patch` in place. Returns `true` when a field changed.
    pub fn apply(&mut self, patch: &ActivityPatch) -> bool {
        let mut changed = false;
        if let Some(status) = patch.status
            && status != self.status
        {
            self.status = status;
            changed = true;
        }
        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }

    pub fn view(&self) -> ActivityView {
        ActivityView::from(self)
    }
}

/// Input for creating an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewActivity {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update sent to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    pub status: Option<ActivityStatus>,
}

impl ActivityPatch {
    pub fn status(status: ActivityStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

/// Public representation returned by the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityView {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub status: ActivityStatus,
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            description: activity.description.clone(),
            status: activity.status,
        }
    }
}

impl From<Activity> for ActivityView {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name,
            description: activity.description,
            status: activity.status,
        }
    }
}
