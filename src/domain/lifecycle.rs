//! Activity lifecycle state machine.
//!
//! ```text
//!               complete            archive
//!   open ---------------> completed ---------> archived
//!     |                       |                    |
//!     +----------- delete ----+-------- delete ----+----> deleted
//! ```
//!
//! `complete` on `completed` and `archive` on `archived` are no-ops, as is
//! `delete` on `deleted`. Every other edge not drawn above is rejected.

use crate::core::{ActivityError, ActivityStatus, Result};
use std::fmt;

pub const ARCHIVE_NOT_COMPLETED_MESSAGE: &str = "Can not archive a not completed activity";
pub const ARCHIVE_DELETED_MESSAGE: &str = "Can not archive a deleted activity";
pub const COMPLETE_ARCHIVED_MESSAGE: &str = "Can not complete an archived activity";
pub const COMPLETE_DELETED_MESSAGE: &str = "Can not complete a deleted activity";

/// Operation requested on an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Complete,
    Archive,
    Delete,
}

/// Result of a permitted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The activity moves to the given status and must be persisted.
    Changed(ActivityStatus),
    /// The activity is already in the target status.
    Unchanged,
}

impl Transition {
    /// Status every successful application ends in.
    pub const fn target(&self) -> ActivityStatus {
        match self {
            Self::Complete => ActivityStatus::Completed,
            Self::Archive => ActivityStatus::Archived,
            Self::Delete => ActivityStatus::Deleted,
        }
    }

    pub fn apply(&self, from: ActivityStatus) -> Result<TransitionOutcome> {
        use ActivityStatus::*;

        if from == self.target() {
            return Ok(TransitionOutcome::Unchanged);
        }

        match (self, from) {
            (Self::Archive, Open) => Err(ActivityError::forbidden(ARCHIVE_NOT_COMPLETED_MESSAGE)),
            (Self::Archive, Deleted) => Err(ActivityError::forbidden(ARCHIVE_DELETED_MESSAGE)),
            (Self::Complete, Archived) => {
                Err(ActivityError::forbidden(COMPLETE_ARCHIVED_MESSAGE))
            }
            (Self::Complete, Deleted) => Err(ActivityError::forbidden(COMPLETE_DELETED_MESSAGE)),
            _ => Ok(TransitionOutcome::Changed(self.target())),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Complete => "complete",
            Self::Archive => "archive",
            Self::Delete => "delete",
        })
    }
}
