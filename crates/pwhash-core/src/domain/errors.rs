//! Errors - TaskManager の結果の分類
//!
//! どの操作も `Result` を返し、成功か以下のいずれか一つのエラーになる。
//! HTTP ステータスへの変換は orchestrator 側の責務。

use thiserror::Error;

use super::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// Input failed the strength policy. Retry with a different input.
    #[error("password is too weak")]
    WeakInput,

    /// Admission latch is set. Terminal for this instance.
    #[error("service is shutting down")]
    ShuttingDown,

    /// Second shutdown request.
    #[error("service is already shutting down")]
    AlreadyShuttingDown,

    #[error("no such task id {0}")]
    NotFound(TaskId),

    /// Valid id, digest still pending. Poll again later.
    #[error("task {0} is not ready")]
    NotReady(TaskId),

    #[error("task {id} failed: {reason}")]
    TaskFailed { id: TaskId, reason: String },
}

impl ManagerError {
    /// Can the caller expect a different outcome by retrying the same call later?
    pub fn is_retryable(&self) -> bool {
        matches!(self, ManagerError::NotReady(_))
    }
}
