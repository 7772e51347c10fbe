//! Domain model (IDs, task state, records, errors).

pub mod errors;
pub mod ids;
pub mod record;
pub mod state;

pub use errors::ManagerError;
pub use ids::{ParseTaskIdError, TaskId};
pub use record::TaskRecord;
pub use state::TaskState;
