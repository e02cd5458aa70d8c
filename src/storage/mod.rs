pub mod engine;
pub mod memory;
pub mod persistence;

pub use engine::{ActivityRepository, StorageError, StorageResult, UpdateOutcome};
pub use memory::InMemoryActivityRepository;
pub use persistence::{ActivitySnapshot, SnapshotActivityRepository};
