//! Digester port - 一方向変換の抽象化

use thiserror::Error;

/// Digester turns a secret into a fixed-length encoded string.
///
/// Implementations must be deterministic and side-effect free. The manager
/// calls `digest` from inside a task's job, never while holding its lock.
///
/// # テスト容易性
/// - trait により実装を差し替え可能
/// - テストでは失敗する Digester を使って Failed 遷移を確認する
pub trait Digester: Send + Sync {
    fn digest(&self, input: &str) -> Result<String, DigestError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("digest failed: {0}")]
pub struct DigestError(pub String);
