//! ログ初期化
//!
//! 進捗表示は標準出力、ログは標準エラーに出す。
//! `RUST_LOG` が設定されていればそちらを優先する。

use tracing_subscriber::{fmt, EnvFilter};

/// ログを初期化する
///
/// 既定は `warn`、`verbose` なら `debug`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
