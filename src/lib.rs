// ============================================================================
// Activity Backend Library
// ============================================================================

pub mod auth;
pub mod config;
pub mod core;
pub mod domain;
pub mod service;
pub mod storage;
pub mod validation;
pub mod web;

// Re-export main types for convenience
pub use auth::{AuthError, Identity, TokenService};
pub use config::AppConfig;
pub use crate::core::{ActivityError, ActivityStatus, ObjectId, Result};
pub use domain::{Activity, ActivityView, NewActivity, Transition};
pub use service::ActivityService;
pub use storage::{ActivityRepository, InMemoryActivityRepository, SnapshotActivityRepository};
pub use validation::{RequestValidator, ValidationError};
pub use web::{AppState, build_router};
