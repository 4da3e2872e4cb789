// crates/tr_crs/src/code.rs

//! 规范化标识符 (code) 与标识元数据
//!
//! 一个 EPSG 数字编号固定展开为 4 种文本形式（`EPSG:` 前缀、URL 形式、
//! OGC 与 OpenGIS 两种 URN 形式），URL/URN 形式统一大写。
//! 同一对象可携带多个别名 code，按任意别名查找都解析到同一对象。
//!
//! # 示例
//!
//! ```
//! use tr_crs::code::CrsCode;
//!
//! let aliases = CrsCode::epsg_aliases("4326");
//! assert_eq!(aliases.len(), 4);
//! assert_eq!(aliases[0].as_str(), "EPSG:4326");
//! assert_eq!(CrsCode::new("epsg:4326"), aliases[0]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// EPSG 前缀形式
pub const EPSG_PREFIX: &str = "EPSG:";
/// OpenGIS URL 形式
pub const OPENGIS_URL: &str = "HTTP://WWW.OPENGIS.NET/GML/SRS/EPSG.XML#";
/// OpenGIS URN 形式
pub const OPENGIS_URN: &str = "URN:OPENGIS:DEF:CRS:EPSG::";
/// OGC URN 形式
pub const OGC_URN: &str = "URN:OGC:DEF:CRS:EPSG::";

// ============================================================================
// CrsCode
// ============================================================================

/// 规范化标识符
///
/// EPSG/URL/URN 形式在构造时统一大写；合成 id（`GEO_CRS_0`、`pm_0` 等）
/// 与裸名称保持原样。相等性与哈希基于规范化后的文本。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrsCode(String);

impl CrsCode {
    /// 从任意文本创建（执行规范化）
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let raw = text.into();
        let trimmed = raw.trim();
        let upper = trimmed.to_ascii_uppercase();
        if upper.starts_with(EPSG_PREFIX)
            || upper.starts_with(OPENGIS_URL)
            || upper.starts_with(OPENGIS_URN)
            || upper.starts_with(OGC_URN)
        {
            Self(upper)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// `EPSG:<n>` 形式
    #[must_use]
    pub fn epsg(number: u32) -> Self {
        Self(format!("{EPSG_PREFIX}{number}"))
    }

    /// 将一个 EPSG 编号展开为固定的 4 别名集合
    ///
    /// 顺序: EPSG 前缀、OGC URN、OpenGIS URL、OpenGIS URN。
    #[must_use]
    pub fn epsg_aliases(number: &str) -> Vec<Self> {
        let number = number.trim();
        vec![
            Self(format!("{EPSG_PREFIX}{number}")),
            Self(format!("{OGC_URN}{number}")),
            Self(format!("{OPENGIS_URL}{number}")),
            Self(format!("{OPENGIS_URN}{number}")),
        ]
    }

    /// 规范化文本
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 提取 EPSG 数字编号（任一别名形式均可）
    #[must_use]
    pub fn epsg_number(&self) -> Option<u32> {
        for prefix in [EPSG_PREFIX, OGC_URN, OPENGIS_URL, OPENGIS_URN] {
            if let Some(suffix) = self.0.strip_prefix(prefix) {
                return suffix.parse().ok();
            }
        }
        None
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CrsCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// Identity
// ============================================================================

/// 标识元数据块
///
/// 所有大地测量对象（椭球体、基准、本初子午线、CRS）共用的
/// code 别名与描述性元数据。对象构造后不可变。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// code 别名集合（按任意别名查找都应命中）
    pub codes: Vec<CrsCode>,
    /// 名称
    pub names: Vec<String>,
    /// 版本
    pub versions: Vec<String>,
    /// 描述
    pub descriptions: Vec<String>,
    /// 适用区域
    pub areas_of_use: Vec<String>,
}

impl Identity {
    /// 仅指定 code 的元数据块
    #[must_use]
    pub fn new(codes: Vec<CrsCode>) -> Self {
        Self {
            codes,
            ..Self::default()
        }
    }

    /// 单一 code 的元数据块
    #[must_use]
    pub fn single(code: CrsCode) -> Self {
        Self::new(vec![code])
    }

    /// 附加名称
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// 附加版本
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.versions.push(version.into());
        self
    }

    /// 附加描述
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.descriptions.push(description.into());
        self
    }

    /// 附加适用区域
    #[must_use]
    pub fn with_area_of_use(mut self, area: impl Into<String>) -> Self {
        self.areas_of_use.push(area.into());
        self
    }

    /// 首个 code（约定为首选形式）
    #[must_use]
    pub fn primary_code(&self) -> Option<&CrsCode> {
        self.codes.first()
    }

    /// 首个名称
    #[must_use]
    pub fn primary_name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// 是否携带给定 code
    #[must_use]
    pub fn has_code(&self, code: &CrsCode) -> bool {
        self.codes.contains(code)
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_alias_expansion() {
        let aliases = CrsCode::epsg_aliases("4326");
        assert_eq!(aliases[0].as_str(), "EPSG:4326");
        assert_eq!(aliases[1].as_str(), "URN:OGC:DEF:CRS:EPSG::4326");
        assert_eq!(
            aliases[2].as_str(),
            "HTTP://WWW.OPENGIS.NET/GML/SRS/EPSG.XML#4326"
        );
        assert_eq!(aliases[3].as_str(), "URN:OPENGIS:DEF:CRS:EPSG::4326");
    }

    #[test]
    fn test_case_normalization() {
        assert_eq!(
            CrsCode::new("epsg:4326"),
            CrsCode::new("EPSG:4326")
        );
        assert_eq!(
            CrsCode::new("urn:ogc:def:crs:epsg::4326"),
            CrsCode::new("URN:OGC:DEF:CRS:EPSG::4326")
        );
        // 合成 id 不做大写转换
        assert_eq!(CrsCode::new("pm_0").as_str(), "pm_0");
        assert_eq!(CrsCode::new("GEO_CRS_3").as_str(), "GEO_CRS_3");
    }

    #[test]
    fn test_epsg_number_extraction() {
        for alias in CrsCode::epsg_aliases("31467") {
            assert_eq!(alias.epsg_number(), Some(31467));
        }
        assert_eq!(CrsCode::new("DATUM_0").epsg_number(), None);
    }

    #[test]
    fn test_identity_builder() {
        let id = Identity::new(CrsCode::epsg_aliases("7019"))
            .with_name("GRS 1980(IUGG, 1980)")
            .with_area_of_use("Unknown");
        assert_eq!(id.primary_code(), Some(&CrsCode::epsg(7019)));
        assert_eq!(id.primary_name(), Some("GRS 1980(IUGG, 1980)"));
        assert!(id.has_code(&CrsCode::new("urn:ogc:def:crs:epsg::7019")));
    }
}
