// crates/tr_crs/src/error.rs

//! 坐标参考系统解析错误类型
//!
//! 包含 PROJ4 定义解析、目录查找、投影分发相关的错误。
//! 所有错误可转换为 `tr_foundation::TrError` 向上传播。
//!
//! # 错误分类
//!
//! - **格式错误**: 角度/数值文本无法解析
//! - **缺参错误**: 定义缺少必需参数（proj、长半轴等）
//! - **目录错误**: 名称不在固定目录中（椭球体、基准、本初子午线、投影、单位）
//! - **操作限制**: 设计上刻意不支持的检索方式
//! - **配置错误**: 解析某个具体 code 时的伞形包装

use crate::code::CrsCode;
use thiserror::Error;
use tr_foundation::TrError;

/// CRS 模块结果类型
pub type CrsResult<T> = Result<T, CrsError>;

/// 坐标参考系统解析错误
#[derive(Error, Debug)]
pub enum CrsError {
    /// 角度或数值文本格式错误
    #[error("格式错误: 无法解析 {text:?}: {reason}")]
    Format {
        /// 出错的原始文本
        text: String,
        /// 失败原因
        reason: String,
    },

    /// 缺少必需参数
    #[error("缺少必需参数 {param:?} (定义 id: {identifier:?})")]
    MissingParameter {
        /// 参数名（如 "proj"、"a"）
        param: &'static str,
        /// 所属定义的 identifier（如有）
        identifier: Option<String>,
    },

    /// 椭球体名称不在目录中
    #[error("未知的椭球体名称: {name:?}")]
    UnknownEllipsoid {
        /// 查找失败的名称
        name: String,
    },

    /// 基准名称不在目录中
    #[error("未知的基准名称: {name:?} (定义 id: {identifier:?})")]
    UnknownDatum {
        /// 查找失败的名称
        name: String,
        /// 所属定义的 identifier（如有）
        identifier: Option<String>,
    },

    /// 本初子午线名称不在目录中
    #[error("未知的本初子午线名称: {name:?} (定义 id: {identifier:?})")]
    UnknownPrimeMeridian {
        /// 查找失败的名称
        name: String,
        /// 所属定义的 identifier（如有）
        identifier: Option<String>,
    },

    /// 投影无法构造
    ///
    /// 已登记但未实现的投影与完全未知的投影统一产生此错误，
    /// 二者的区分通过 `projection::is_recognized` 查询。
    #[error("不支持的投影: {name:?}")]
    UnsupportedProjection {
        /// 投影短名
        name: String,
    },

    /// 单位名称不在目录中
    #[error("未知的单位名称: {name:?} (定义 id: {identifier:?})")]
    UnknownUnit {
        /// 查找失败的名称
        name: String,
        /// 所属定义的 identifier（如有）
        identifier: Option<String>,
    },

    /// 设计上不支持的操作
    #[error("不支持的操作: {operation}")]
    UnsupportedOperation {
        /// 操作描述
        operation: String,
    },

    /// 外部目录中不存在该 code
    #[error("目录中不存在 code: {code}")]
    UnknownCode {
        /// 查找失败的 code
        code: CrsCode,
    },

    /// 解析某个具体 code 时的伞形包装
    #[error("CRS 定义无效 [{code}]: {source}")]
    Configuration {
        /// 解析失败的 code
        code: CrsCode,
        /// 底层具体错误
        #[source]
        source: Box<CrsError>,
    },
}

// ============================================================================
// 便捷构造函数
// ============================================================================

impl CrsError {
    /// 创建格式错误
    #[inline]
    pub fn format(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// 创建缺参错误
    #[inline]
    pub fn missing_parameter(param: &'static str, identifier: Option<String>) -> Self {
        Self::MissingParameter { param, identifier }
    }

    /// 创建未知椭球体错误
    #[inline]
    pub fn unknown_ellipsoid(name: impl Into<String>) -> Self {
        Self::UnknownEllipsoid { name: name.into() }
    }

    /// 创建未知基准错误
    #[inline]
    pub fn unknown_datum(name: impl Into<String>, identifier: Option<String>) -> Self {
        Self::UnknownDatum {
            name: name.into(),
            identifier,
        }
    }

    /// 创建未知本初子午线错误
    #[inline]
    pub fn unknown_prime_meridian(name: impl Into<String>, identifier: Option<String>) -> Self {
        Self::UnknownPrimeMeridian {
            name: name.into(),
            identifier,
        }
    }

    /// 创建不支持的投影错误
    #[inline]
    pub fn unsupported_projection(name: impl Into<String>) -> Self {
        Self::UnsupportedProjection { name: name.into() }
    }

    /// 创建未知单位错误
    #[inline]
    pub fn unknown_unit(name: impl Into<String>, identifier: Option<String>) -> Self {
        Self::UnknownUnit {
            name: name.into(),
            identifier,
        }
    }

    /// 创建不支持的操作错误
    #[inline]
    pub fn unsupported_operation(operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
        }
    }

    /// 创建未知 code 错误
    #[inline]
    pub fn unknown_code(code: &CrsCode) -> Self {
        Self::UnknownCode { code: code.clone() }
    }

    /// 包装为针对具体 code 的配置错误
    ///
    /// 已经是 `Configuration` 的错误不再二次包装。
    #[must_use]
    pub fn into_configuration(self, code: &CrsCode) -> Self {
        match self {
            Self::Configuration { .. } => self,
            other => Self::Configuration {
                code: code.clone(),
                source: Box::new(other),
            },
        }
    }

    /// 是否为针对具体 code 的配置错误
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

// ============================================================================
// 转换实现
// ============================================================================

impl From<CrsError> for TrError {
    fn from(err: CrsError) -> Self {
        match err {
            CrsError::Format { text, reason } => {
                TrError::invalid_input(format!("无法解析 {text:?}: {reason}"))
            }
            CrsError::MissingParameter { param, identifier } => {
                TrError::missing_config(match identifier {
                    Some(id) => format!("{param} (定义 id: {id})"),
                    None => param.to_string(),
                })
            }
            CrsError::UnknownEllipsoid { name } => {
                TrError::invalid_input(format!("未知的椭球体名称 {name:?}"))
            }
            CrsError::UnknownDatum { name, .. } => {
                TrError::invalid_input(format!("未知的基准名称 {name:?}"))
            }
            CrsError::UnknownPrimeMeridian { name, .. } => {
                TrError::invalid_input(format!("未知的本初子午线名称 {name:?}"))
            }
            CrsError::UnsupportedProjection { name } => {
                TrError::invalid_input(format!("不支持的投影 {name:?}"))
            }
            CrsError::UnknownUnit { name, .. } => {
                TrError::invalid_input(format!("未知的单位名称 {name:?}"))
            }
            CrsError::UnsupportedOperation { operation } => TrError::not_implemented(operation),
            CrsError::UnknownCode { code } => TrError::not_found(code.to_string()),
            CrsError::Configuration { code, source } => {
                TrError::config(format!("CRS 定义无效 [{code}]: {source}"))
            }
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
    fn test_format_error_message() {
        let err = CrsError::format("12x34", "未找到度标记");
        let msg = format!("{err}");
        assert!(msg.contains("12x34"));
        assert!(msg.contains("未找到度标记"));
    }

    #[test]
    fn test_configuration_wrap_once() {
        let code = CrsCode::epsg(4326);
        let err = CrsError::unknown_datum("foo", None).into_configuration(&code);
        assert!(err.is_configuration());

        // 已包装的错误不再嵌套
        let rewrapped = err.into_configuration(&CrsCode::epsg(4327));
        match rewrapped {
            CrsError::Configuration { code, .. } => assert_eq!(code, CrsCode::epsg(4326)),
            _ => panic!("错误的错误类型"),
        }
    }

    #[test]
    fn test_umbrella_conversion_buckets() {
        let invalid: TrError = CrsError::unknown_ellipsoid("nope").into();
        assert!(matches!(invalid, TrError::InvalidInput { .. }));

        let unimplemented: TrError =
            CrsError::unsupported_operation("按 id 检索任意对象").into();
        assert!(matches!(unimplemented, TrError::NotImplemented { .. }));

        let config: TrError = CrsError::unknown_datum("x", None)
            .into_configuration(&CrsCode::epsg(1))
            .into();
        assert!(matches!(config, TrError::Config { .. }));
    }

    #[test]
    fn test_missing_parameter_display() {
        let err = CrsError::missing_parameter("proj", Some("4326".into()));
        let msg = format!("{err}");
        assert!(msg.contains("proj"));
        assert!(msg.contains("4326"));
    }
}
