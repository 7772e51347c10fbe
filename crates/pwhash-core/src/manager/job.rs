//! Job - 1 タスクにつき 1 つ spawn される非同期処理
//!
//! # フロー
//! 1. 開始時刻を記録
//! 2. Digester で digest を計算（ロックは持たない、panic は失敗として扱う）
//! 3. 設定された遅延だけ待つ
//! 4. 経過時間を計算
//! 5. ロックを取って結果・状態・集計を一括で更新
//! 6. OutstandingGuard を drop（5 の commit 後）

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::outstanding::OutstandingGuard;
use super::state::ManagerState;
use crate::domain::TaskId;
use crate::observability::as_micros_saturating;
use crate::ports::{DigestError, Digester};

pub(crate) struct Job {
    pub(crate) id: TaskId,
    /// The secret. Dropped as soon as the digest is computed.
    pub(crate) input: String,
    pub(crate) delay: Duration,
    pub(crate) digester: Arc<dyn Digester>,
    pub(crate) state: Arc<Mutex<ManagerState>>,
    pub(crate) guard: OutstandingGuard,
}

impl Job {
    pub(crate) async fn run(self) {
        let Job {
            id,
            input,
            delay,
            digester,
            state,
            guard,
        } = self;

        let start = Instant::now();
        let digest = panic::catch_unwind(AssertUnwindSafe(|| digester.digest(&input)))
            .unwrap_or_else(|payload| Err(panic_to_error(payload)));
        drop(input);

        tokio::time::sleep(delay).await;
        let elapsed = start.elapsed();

        {
            let mut state = state.lock().await;
            match digest {
                Ok(digest) => {
                    state.complete(id, digest, elapsed);
                    tracing::debug!(
                        task_id = %id,
                        elapsed_us = as_micros_saturating(elapsed),
                        "task done"
                    );
                }
                Err(e) => {
                    state.fail(id, e.to_string());
                    tracing::warn!(task_id = %id, error = %e, "task failed");
                }
            }
        } // Lock released here

        drop(guard);
    }
}

fn panic_to_error(payload: Box<dyn Any + Send>) -> DigestError {
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    DigestError(format!("digester panicked: {msg}"))
}
