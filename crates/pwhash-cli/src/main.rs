//! pwhash - HTTP server entry point
//!
//! 起動の流れ:
//! (A) 設定ファイルを読む（なければデフォルトで作成）
//! (B) ログを初期化
//! (C) サーバを bind して、shutdown 要求で全タスクが終わるまで serve
//!
//! The config path comes from `PWHASH_CONFIG` (default `config.json`).

use anyhow::Context;
use pwhash_core::Config;
use pwhash_server::{Server, logging};

const CONFIG_ENV: &str = "PWHASH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // (A)
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::open_file(&path).with_context(|| format!("loading {path}"))?;

    // (B)
    logging::init(&config).context("initializing logging")?;
    tracing::info!(
        config = %path,
        delay_secs = config.max_task_seconds,
        check_strength = config.check_password_strength,
        "configuration loaded"
    );

    // (C)
    let server = Server::bind(&config).await?;
    server.run().await?;

    Ok(())
}
