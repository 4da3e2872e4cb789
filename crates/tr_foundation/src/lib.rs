// crates/tr_foundation/src/lib.rs

//! TerraRef Foundation Layer
//!
//! 基础层，提供整个项目的跨领域抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 (`TrError` / `TrResult`)
//! - [`logging`]: tracing 日志初始化
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 thiserror 和 tracing 系列
//! 2. **层次化**: 领域错误（坐标系解析等）在 `tr_crs` 中定义，
//!    通过 `From` 转换向上聚合到 `TrError`
//!
//! # 示例
//!
//! ```
//! use tr_foundation::{TrError, TrResult, ensure};
//!
//! fn check_zone(zone: u8) -> TrResult<()> {
//!     ensure!((1..=60).contains(&zone), TrError::invalid_input("带号超出范围"));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod logging;

pub use error::{TrError, TrResult};

/// 条件检查宏，不满足时提前返回给定错误
///
/// # 示例
///
/// ```
/// use tr_foundation::{TrError, TrResult, ensure};
///
/// fn positive(x: f64) -> TrResult<f64> {
///     ensure!(x > 0.0, TrError::invalid_input("必须为正数"));
///     Ok(x)
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::ensure;
    pub use crate::error::{TrError, TrResult};
}
