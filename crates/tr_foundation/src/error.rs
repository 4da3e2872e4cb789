// crates/tr_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `TrError` 枚举和 `TrResult` 类型别名。领域相关的错误
//! （如坐标系解析错误）在各自 crate 中定义，并实现到 `TrError` 的转换。
//!
//! # 错误分类
//!
//! - **输入错误**: 调用方给出的数据无效（可修复）
//! - **配置错误**: 外部定义/配置不完整或自相矛盾
//! - **未实现**: 设计上刻意不支持的操作
//! - **内部错误**: 不应出现的状态

use thiserror::Error;

/// 统一结果类型
pub type TrResult<T> = Result<T, TrError>;

/// TerraRef 错误类型
#[derive(Error, Debug)]
pub enum TrError {
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        /// 可选的底层 IO 错误
        #[source]
        source: Option<std::io::Error>,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 缺少配置项
    #[error("缺少必需的配置项: {key}")]
    MissingConfig {
        /// 配置键名
        key: String,
    },

    /// 功能未实现
    #[error("功能未实现: {feature}")]
    NotImplemented {
        /// 未实现的功能描述
        feature: String,
    },

    /// 资源未找到
    #[error("资源未找到: {resource}")]
    NotFound {
        /// 资源名称
        resource: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl TrError {
    /// 从IO错误创建
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 缺少配置
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig { key: key.into() }
    }

    /// 功能未实现
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }

    /// 资源未找到
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TrError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = TrError::invalid_input("缺少 proj 参数");
        let msg = format!("{err}");
        assert!(msg.contains("无效的输入数据"));
        assert!(msg.contains("proj"));
    }

    #[test]
    fn test_missing_config() {
        let err = TrError::missing_config("datum");
        match &err {
            TrError::MissingConfig { key } => assert_eq!(key, "datum"),
            _ => panic!("错误的错误类型"),
        }
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: TrError = io.into();
        match err {
            TrError::Io { source, .. } => assert!(source.is_some()),
            _ => panic!("错误的错误类型"),
        }
    }

    #[test]
    fn test_not_implemented() {
        let err = TrError::not_implemented("按 id 检索任意对象");
        assert!(format!("{err}").contains("功能未实现"));
    }
}
