use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::TaskState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub pending: usize,
    pub done: usize,
    pub failed: usize,
}

impl TaskCounts {
    pub fn record(&mut self, state: TaskState) {
        match state {
            TaskState::Pending => self.pending += 1,
            TaskState::Done => self.done += 1,
            TaskState::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.done + self.failed
    }
}

/// Duration as whole microseconds, saturating at `u64::MAX`.
pub fn as_micros_saturating(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
