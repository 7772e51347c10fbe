//! TaskManager - タスクの採番・実行・集計・シャットダウン
//!
//! The manager owns the task table. Callers get ids and read-only answers;
//! they never touch records directly.
//!
//! Lifecycle: `new` → serve (`submit` / `status` / `stats`) → `shutdown` →
//! `await_idle` → drop.
//!
//! # 設計
//! - 可変状態はすべて `ManagerState` にまとめ、単一の `Mutex` で守る
//! - タスクごとに 1 つ tokio task を spawn する
//! - `await_idle` は watch ベースのカウンタで待つ（ポーリングしない）

mod job;
mod outstanding;
mod state;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use self::job::Job;
use self::outstanding::Outstanding;
use self::state::ManagerState;
use crate::domain::{ManagerError, TaskId, TaskState};
use crate::impls::Sha512Base64;
use crate::observability::TaskCounts;
use crate::ports::Digester;
use crate::strength::StrengthRules;

/// Immutable configuration, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Artificial delay every job waits after computing its digest.
    pub delay: Duration,

    /// Reject inputs that fail `rules` before admitting them.
    pub enforce_strength: bool,

    pub rules: StrengthRules,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            enforce_strength: true,
            rules: StrengthRules::default(),
        }
    }
}

/// Aggregate statistics over completed tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of tasks that reached Done.
    pub total: u64,
    /// Mean job runtime in microseconds (0 when `total == 0`).
    pub average: u64,
}

pub struct TaskManager {
    config: ManagerConfig,
    state: Arc<Mutex<ManagerState>>,
    digester: Arc<dyn Digester>,
    outstanding: Outstanding,
}

impl TaskManager {
    /// Manager with the default SHA-512 digester.
    pub fn new(config: ManagerConfig) -> Self {
        Self::with_digester(config, Arc::new(Sha512Base64))
    }

    pub fn with_digester(config: ManagerConfig, digester: Arc<dyn Digester>) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(ManagerState::new())),
            digester,
            outstanding: Outstanding::new(),
        }
    }

    /// Admit a new task and spawn its job.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn submit(&self, input: impl Into<String>) -> Result<TaskId, ManagerError> {
        if self.is_shutting_down().await {
            return Err(ManagerError::ShuttingDown);
        }

        let input = input.into();
        if self.config.enforce_strength && !self.config.rules.passes(&input) {
            tracing::debug!("submission rejected: weak input");
            return Err(ManagerError::WeakInput);
        }

        let mut state = self.state.lock().await;
        // latch may have been set while the strength check ran
        if state.shutting_down {
            return Err(ManagerError::ShuttingDown);
        }

        let id = state.admit();
        let job = Job {
            id,
            input,
            delay: self.config.delay,
            digester: Arc::clone(&self.digester),
            state: Arc::clone(&self.state),
            guard: self.outstanding.acquire(),
        };
        tokio::spawn(job.run());
        drop(state);

        tracing::debug!(task_id = %id, "task submitted");
        Ok(id)
    }

    /// Digest of a finished task.
    pub async fn status(&self, id: TaskId) -> Result<String, ManagerError> {
        let state = self.state.lock().await;
        if state.shutting_down {
            return Err(ManagerError::ShuttingDown);
        }

        let record = state.tasks.get(&id).ok_or(ManagerError::NotFound(id))?;
        if !record.state.is_terminal() {
            return Err(ManagerError::NotReady(id));
        }
        match record.state {
            TaskState::Failed => Err(ManagerError::TaskFailed {
                id,
                reason: record.failure.clone().unwrap_or_default(),
            }),
            _ => record.result.clone().ok_or(ManagerError::NotReady(id)),
        }
    }

    pub async fn stats(&self) -> Result<Stats, ManagerError> {
        let state = self.state.lock().await;
        if state.shutting_down {
            return Err(ManagerError::ShuttingDown);
        }

        Ok(Stats {
            total: state.completed,
            average: state.average_micros(),
        })
    }

    /// Set the admission latch. Succeeds once; later calls get
    /// `AlreadyShuttingDown`. Does not wait for running jobs.
    pub async fn shutdown(&self) -> Result<(), ManagerError> {
        let mut state = self.state.lock().await;
        if state.shutting_down {
            return Err(ManagerError::AlreadyShuttingDown);
        }
        state.shutting_down = true;
        drop(state);

        tracing::info!(
            outstanding = self.outstanding.count(),
            "task manager shutting down"
        );
        Ok(())
    }

    /// Wait until every spawned job has committed its completion.
    pub async fn await_idle(&self) {
        self.outstanding.wait_idle().await;
    }

    pub async fn is_shutting_down(&self) -> bool {
        self.state.lock().await.shutting_down
    }

    /// Snapshot of the table by state. Not gated by the latch.
    pub async fn counts(&self) -> TaskCounts {
        self.state.lock().await.counts()
    }

    /// Number of jobs spawned but not yet committed.
    pub fn outstanding(&self) -> usize {
        self.outstanding.count()
    }
}
