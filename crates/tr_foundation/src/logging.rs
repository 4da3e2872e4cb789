// crates/tr_foundation/src/logging.rs

//! 日志初始化
//!
//! 基于 tracing / tracing-subscriber 的全局日志配置。
//! 库代码只使用 `tracing` 宏打点；订阅器由应用或测试显式安装。

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::error::{TrError, TrResult};

/// 将字符串日志级别解析为 [`Level`]，无法识别时回退到 INFO
#[must_use]
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// 安装全局日志订阅器
///
/// # Errors
/// 如果全局订阅器已被安装则返回错误
pub fn init(level: &str) -> TrResult<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TrError::config(format!("日志订阅器安装失败: {e}")))
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("unknown"), Level::INFO);
    }

    #[test]
    fn test_init_installs_global_subscriber() {
        // 首次安装成功，重复安装报错
        init("debug").expect("首次安装");
        assert!(init("info").is_err());
        tracing::debug!("订阅器已就位");
    }
}
