pub mod activity;
pub mod lifecycle;

pub use activity::{
    Activity, ActivityPatch, ActivityView, DESCRIPTION_MAX_LEN, NAME_MAX_LEN, NewActivity,
};
pub use lifecycle::{Transition, TransitionOutcome};
