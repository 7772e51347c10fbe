//! Ports - 抽象化レイヤー
//!
//! TaskManager が依存する外部の計算をここで trait として定義する。
//! 実装は `impls` にある。

pub mod digester;

pub use self::digester::{DigestError, Digester};
