//! Task identifiers.
//!
//! IDs are issued by the manager from a counter that starts at 1, so `0` never
//! refers to a task. Parsing is the orchestrator's job: a malformed string is
//! rejected here and never reaches the manager.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid task id {0:?}")]
pub struct ParseTaskIdError(String);

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(TaskId)
            .map_err(|_| ParseTaskIdError(s.to_string()))
    }
}
