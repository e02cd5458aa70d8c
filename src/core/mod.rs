pub mod error;
pub mod types;

pub use error::{ACTIVITY_NOT_FOUND_CODE, ACTIVITY_NOT_FOUND_MESSAGE, ActivityError, Result};
pub use types::{ActivityStatus, OBJECT_ID_LEN, ObjectId, ParseObjectIdError};
