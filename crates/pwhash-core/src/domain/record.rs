//! Task record: id + state + result.

use super::{TaskId, TaskState};

/// One entry of the manager's task table.
///
/// Design:
/// - The secret is not stored here. It is moved into the task's job and dropped
///   when the job finishes.
/// - `result` is `Some` iff `state == Done`.
/// - All state transitions happen here, and only out of `Pending`.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: TaskId,
    pub state: TaskState,

    /// Encoded digest, set once on completion.
    pub result: Option<String>,

    /// Why the job failed (for Failed state).
    pub failure: Option<String>,
}

impl TaskRecord {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            state: TaskState::Pending,
            result: None,
            failure: None,
        }
    }

    /// Mark as done. Returns `false` (and changes nothing) if the task already
    /// reached a terminal state.
    pub fn mark_done(&mut self, digest: String) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = TaskState::Done;
        self.result = Some(digest);
        true
    }

    /// Mark as failed. Same single-transition rule as `mark_done`.
    pub fn mark_failed(&mut self, reason: String) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = TaskState::Failed;
        self.failure = Some(reason);
        true
    }
}
