//! Manager state guarded by the single manager lock.

use std::collections::HashMap;
use std::time::Duration;

use crate::domain::{TaskId, TaskRecord};
use crate::observability::TaskCounts;

/// Everything mutable the manager owns. One `Mutex` around the whole struct;
/// critical sections are O(1).
pub(crate) struct ManagerState {
    /// All task records, by id.
    pub(crate) tasks: HashMap<TaskId, TaskRecord>,

    /// Next id to assign. Starts at 1.
    next_id: u64,

    /// Tasks that reached Done.
    pub(crate) completed: u64,

    /// Sum of the elapsed time of every Done task.
    pub(crate) total_runtime: Duration,

    /// Admission latch. false -> true once, never back.
    pub(crate) shutting_down: bool,
}

impl ManagerState {
    pub(crate) fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            next_id: 1,
            completed: 0,
            total_runtime: Duration::ZERO,
            shutting_down: false,
        }
    }

    /// Allocate an id and insert a Pending record for it.
    pub(crate) fn admit(&mut self) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        self.tasks.insert(id, TaskRecord::new(id));
        id
    }

    /// Completion step of a job. Result, state and both counters move together.
    pub(crate) fn complete(&mut self, id: TaskId, digest: String, elapsed: Duration) {
        let Some(record) = self.tasks.get_mut(&id) else {
            return;
        };
        if record.mark_done(digest) {
            self.total_runtime += elapsed;
            self.completed += 1;
        }
    }

    pub(crate) fn fail(&mut self, id: TaskId, reason: String) {
        if let Some(record) = self.tasks.get_mut(&id) {
            record.mark_failed(reason);
        }
    }

    /// Mean runtime of Done tasks in microseconds, 0 when none completed.
    pub(crate) fn average_micros(&self) -> u64 {
        if self.completed == 0 {
            return 0;
        }
        let avg = self.total_runtime.as_micros() / u128::from(self.completed);
        u64::try_from(avg).unwrap_or(u64::MAX)
    }

    pub(crate) fn counts(&self) -> TaskCounts {
        let mut counts = TaskCounts::default();
        for record in self.tasks.values() {
            counts.record(record.state);
        }
        counts
    }

    #[cfg(test)]
    pub(crate) fn state_of(&self, id: TaskId) -> Option<crate::domain::TaskState> {
        self.tasks.get(&id).map(|r| r.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskState;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut state = ManagerState::new();
        assert_eq!(state.admit(), TaskId::new(1));
        assert_eq!(state.admit(), TaskId::new(2));
        assert_eq!(state.admit(), TaskId::new(3));
        assert_eq!(state.tasks.len(), 3);
    }

    #[test]
    fn average_is_zero_without_completions() {
        let state = ManagerState::new();
        assert_eq!(state.average_micros(), 0);
    }

    #[test]
    fn complete_updates_counters_together() {
        let mut state = ManagerState::new();
        let a = state.admit();
        let b = state.admit();

        state.complete(a, "x".into(), Duration::from_millis(10));
        state.complete(b, "y".into(), Duration::from_millis(30));

        assert_eq!(state.completed, 2);
        assert_eq!(state.total_runtime, Duration::from_millis(40));
        assert_eq!(state.average_micros(), 20_000);
    }

    #[test]
    fn second_completion_is_ignored() {
        let mut state = ManagerState::new();
        let id = state.admit();
        state.complete(id, "x".into(), Duration::from_millis(10));
        state.complete(id, "y".into(), Duration::from_millis(10));

        assert_eq!(state.completed, 1);
        assert_eq!(state.tasks[&id].result.as_deref(), Some("x"));
    }

    #[test]
    fn failed_task_is_not_counted_as_completed() {
        let mut state = ManagerState::new();
        let id = state.admit();
        state.fail(id, "boom".into());

        assert_eq!(state.completed, 0);
        assert_eq!(state.state_of(id), Some(TaskState::Failed));
        assert_eq!(
            state.counts(),
            TaskCounts {
                pending: 0,
                done: 0,
                failed: 1
            }
        );
    }
}
