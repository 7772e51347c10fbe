//! pwhash-core
//!
//! Core building blocks for the pwhash service.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, state, record, errors）
//! - **ports**: 抽象化レイヤー（Digester）
//! - **impls**: 実装（SHA-512 + base64 の Digester）
//! - **manager**: TaskManager（タスクの採番・実行・集計・シャットダウン）
//! - **strength**: パスワード強度ルール
//! - **config**: JSON 設定ファイル
//! - **observability**: 状態ごとのカウント

pub mod config;
pub mod domain;
pub mod impls;
pub mod manager;
pub mod observability;
pub mod ports;
pub mod strength;

pub use config::{Config, ConfigError, LogDestination, LogLevel};
pub use domain::{ManagerError, ParseTaskIdError, TaskId, TaskRecord, TaskState};
pub use manager::{ManagerConfig, Stats, TaskManager};
pub use observability::{TaskCounts, as_micros_saturating};
pub use strength::StrengthRules;
