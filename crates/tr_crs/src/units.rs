// crates/tr_crs/src/units.rs

//! 量测单位
//!
//! 投影坐标轴的线性单位与地理坐标轴的角度单位。
//! 支持按 PROJ4 名称查表（`units=ft` 等），或按 `to_meter`
//! 换算因子构造匿名单位；缺省为米。

use crate::error::{CrsError, CrsResult};
use crate::params::ParamMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 量测单位
///
/// `scale` 为到基准单位（线性: 米，角度: 弧度）的换算因子。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    /// 单位名称
    pub name: String,
    /// 到基准单位的换算因子
    pub scale: f64,
    /// 是否为角度单位
    pub angular: bool,
}

/// 固定单位目录条目: (PROJ 名称, 显示名称, 到米的因子)
const LINEAR_UNITS: &[(&str, &str, f64)] = &[
    ("m", "metre", 1.0),
    ("metre", "metre", 1.0),
    ("meter", "metre", 1.0),
    ("km", "kilometre", 1000.0),
    ("dm", "decimetre", 0.1),
    ("cm", "centimetre", 0.01),
    ("mm", "millimetre", 0.001),
    ("ft", "international foot", 0.3048),
    ("us-ft", "US survey foot", 1200.0 / 3937.0),
    ("yd", "international yard", 0.9144),
    ("in", "international inch", 0.0254),
    ("mi", "international statute mile", 1609.344),
    ("kmi", "international nautical mile", 1852.0),
    ("fath", "international fathom", 1.8288),
    ("ch", "international chain", 20.1168),
    ("link", "international link", 0.201168),
];

impl UnitOfMeasure {
    /// 米（线性基准单位）
    #[must_use]
    pub fn metre() -> Self {
        Self {
            name: "metre".to_string(),
            scale: 1.0,
            angular: false,
        }
    }

    /// 弧度（角度基准单位）
    #[must_use]
    pub fn radian() -> Self {
        Self {
            name: "radian".to_string(),
            scale: 1.0,
            angular: true,
        }
    }

    /// 十进制度
    #[must_use]
    pub fn degree() -> Self {
        Self {
            name: "degree".to_string(),
            scale: std::f64::consts::PI / 180.0,
            angular: true,
        }
    }

    /// 按 PROJ4 单位名称查表
    ///
    /// # Errors
    /// 名称不在固定目录中时返回 `UnknownUnit`
    pub fn from_proj_name(name: &str, identifier: Option<String>) -> CrsResult<Self> {
        let trimmed = name.trim();
        match trimmed {
            "degree" | "deg" => return Ok(Self::degree()),
            "rad" => return Ok(Self::radian()),
            _ => {}
        }
        LINEAR_UNITS
            .iter()
            .find(|(proj, _, _)| proj.eq_ignore_ascii_case(trimmed))
            .map(|(_, display, scale)| Self {
                name: (*display).to_string(),
                scale: *scale,
                angular: false,
            })
            .ok_or_else(|| CrsError::unknown_unit(trimmed, identifier))
    }

    /// 从 `to_meter` 换算因子构造匿名单位
    #[must_use]
    pub fn from_scale(to_meter: f64) -> Self {
        Self {
            name: "unknown".to_string(),
            scale: to_meter,
            angular: false,
        }
    }

    /// 是否就是米
    #[must_use]
    pub fn is_metre(&self) -> bool {
        !self.angular && (self.scale - 1.0).abs() < f64::EPSILON
    }

    /// 将以本单位计的值换算到基准单位
    #[inline]
    #[must_use]
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.scale
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (x{})", self.name, self.scale)
    }
}

/// 从参数表解析投影线性单位
///
/// 优先 `units` 名称查表，其次 `to_meter` 因子，缺省为米。
///
/// # Errors
/// `units` 名称未知或 `to_meter` 不是数字时返回错误
pub fn resolve_unit(params: &mut ParamMap) -> CrsResult<UnitOfMeasure> {
    let identifier = params.identifier();
    if let Some(name) = params.take_nonblank("units") {
        return UnitOfMeasure::from_proj_name(&name, identifier);
    }
    if let Some(factor) = params.take_f64("to_meter")? {
        return Ok(UnitOfMeasure::from_scale(factor));
    }
    Ok(UnitOfMeasure::metre())
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_lookup() {
        let ft = UnitOfMeasure::from_proj_name("ft", None).expect("ft");
        assert!((ft.scale - 0.3048).abs() < 1e-12);
        assert!(!ft.angular);

        let usft = UnitOfMeasure::from_proj_name("US-FT", None).expect("大小写不敏感");
        assert!((usft.scale - 1200.0 / 3937.0).abs() < 1e-15);
    }

    #[test]
    fn test_unknown_unit() {
        let err = UnitOfMeasure::from_proj_name("cubit", Some("4326".into())).unwrap_err();
        assert!(matches!(err, CrsError::UnknownUnit { .. }));
    }

    #[test]
    fn test_resolve_unit_precedence() {
        // units 名称优先
        let mut params = ParamMap::new([
            ("units".to_string(), "km".to_string()),
            ("to_meter".to_string(), "0.5".to_string()),
        ]);
        let unit = resolve_unit(&mut params).expect("units");
        assert!((unit.scale - 1000.0).abs() < 1e-12);

        // 其次 to_meter
        let mut params = ParamMap::new([("to_meter".to_string(), "0.5".to_string())]);
        let unit = resolve_unit(&mut params).expect("to_meter");
        assert_eq!(unit.name, "unknown");
        assert!((unit.scale - 0.5).abs() < 1e-12);

        // 缺省为米
        let mut params = ParamMap::default();
        assert!(resolve_unit(&mut params).expect("缺省").is_metre());
    }

    #[test]
    fn test_angular_units() {
        let deg = UnitOfMeasure::from_proj_name("degree", None).expect("degree");
        assert!(deg.angular);
        assert!((deg.to_base(180.0) - std::f64::consts::PI).abs() < 1e-12);
    }
}
