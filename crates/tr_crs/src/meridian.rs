// crates/tr_crs/src/meridian.rs

//! 本初子午线定义与解析
//!
//! 缺省为格林尼治；另收录 12 个历史命名子午线，
//! 每个条目携带固定 EPSG 编号与六十进制经度文本。

use crate::angle::{parse_angle, AngleUnit};
use crate::code::{CrsCode, Identity};
use crate::error::{CrsError, CrsResult};
use crate::params::ParamMap;
use crate::store::ResolveContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 本初子午线
///
/// 经度以弧度计，0 表示格林尼治。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimeMeridian {
    /// 相对格林尼治的经度 (rad)
    pub longitude: f64,
    /// 标识元数据
    pub identity: Identity,
}

impl PrimeMeridian {
    /// 创建本初子午线
    #[must_use]
    pub fn new(longitude: f64, identity: Identity) -> Self {
        Self {
            longitude,
            identity,
        }
    }

    /// 格林尼治子午线 (EPSG:8901)
    #[must_use]
    pub fn greenwich() -> Self {
        Self::new(
            0.0,
            Identity::new(CrsCode::epsg_aliases("8901")).with_name("Greenwich"),
        )
    }

    /// 按 proj 名称在固定目录中查找
    ///
    /// 名称匹配大小写不敏感；`greenwich` 直接返回格林尼治。
    ///
    /// # Errors
    /// 名称不在目录中时返回 `UnknownPrimeMeridian`
    pub fn from_proj_name(name: &str, identifier: Option<String>) -> CrsResult<Self> {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("greenwich") {
            return Ok(Self::greenwich());
        }
        let entry = MERIDIAN_CATALOG
            .iter()
            .find(|e| e.proj_name.eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CrsError::unknown_prime_meridian(trimmed, identifier))?;
        let longitude = parse_angle(entry.longitude, AngleUnit::Radians)?;
        Ok(Self::new(
            longitude,
            Identity::new(CrsCode::epsg_aliases(entry.epsg)).with_name(entry.proj_name),
        ))
    }
}

impl std::fmt::Display for PrimeMeridian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.identity.primary_name() {
            Some(name) => write!(f, "PrimeMeridian({name}, {} rad)", self.longitude),
            None => write!(f, "PrimeMeridian({} rad)", self.longitude),
        }
    }
}

// ============================================================================
// 命名子午线目录
// ============================================================================

struct CatalogMeridian {
    proj_name: &'static str,
    epsg: &'static str,
    /// 六十进制经度文本，解析规则见 [`crate::angle`]
    longitude: &'static str,
}

/// proj 约定的历史命名子午线目录
static MERIDIAN_CATALOG: &[CatalogMeridian] = &[
    CatalogMeridian { proj_name: "athens", epsg: "8912", longitude: "23d42'58.815\"E" },
    CatalogMeridian { proj_name: "bern", epsg: "8907", longitude: "7d26'22.5\"E" },
    CatalogMeridian { proj_name: "bogota", epsg: "8904", longitude: "74d04'51.3\"W" },
    CatalogMeridian { proj_name: "brussels", epsg: "8910", longitude: "4d22'4.71\"E" },
    CatalogMeridian { proj_name: "ferro", epsg: "8909", longitude: "17d40'W" },
    CatalogMeridian { proj_name: "jakarta", epsg: "8908", longitude: "106d48'27.79\"E" },
    CatalogMeridian { proj_name: "lisbon", epsg: "8902", longitude: "9d07'54.862\"W" },
    CatalogMeridian { proj_name: "madrid", epsg: "8905", longitude: "3d41'16.58\"W" },
    CatalogMeridian { proj_name: "oslo", epsg: "8913", longitude: "10d43'22.5\"E" },
    CatalogMeridian { proj_name: "paris", epsg: "8903", longitude: "2d20'14.025\"E" },
    CatalogMeridian { proj_name: "rome", epsg: "8906", longitude: "12d27'8.4\"E" },
    CatalogMeridian { proj_name: "stockholm", epsg: "8911", longitude: "18d3'29.8\"E" },
];

// ============================================================================
// 解析
// ============================================================================

/// 从参数表解析本初子午线
///
/// `pm` 缺失、空白或为 `greenwich` 时返回格林尼治。
///
/// # Errors
/// `pm` 名称不在目录中时返回 `UnknownPrimeMeridian`
pub fn resolve_prime_meridian(
    params: &mut ParamMap,
    ctx: &mut ResolveContext<'_>,
) -> CrsResult<PrimeMeridian> {
    let meridian = match params.take_nonblank("pm") {
        None => PrimeMeridian::greenwich(),
        Some(name) => {
            debug!(name, "按名称解析本初子午线");
            PrimeMeridian::from_proj_name(&name, params.identifier())?
        }
    };
    ctx.record_meridian(&meridian);
    Ok(meridian)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::IdCounters;

    #[test]
    fn test_greenwich_default() {
        let mut params = ParamMap::default();
        let mut counters = IdCounters::default();
        let mut ctx = ResolveContext::new(&mut counters, "2024-1-1T0:00");
        let pm = resolve_prime_meridian(&mut params, &mut ctx).expect("缺省");
        assert_eq!(pm.longitude, 0.0);
        assert!(pm.identity.has_code(&CrsCode::epsg(8901)));
    }

    #[test]
    fn test_greenwich_by_name_case_insensitive() {
        let pm = PrimeMeridian::from_proj_name("GreenWich", None).expect("greenwich");
        assert_eq!(pm.longitude, 0.0);
    }

    #[test]
    fn test_paris() {
        let pm = PrimeMeridian::from_proj_name("paris", None).expect("paris");
        // 2d20'14.025"E = 2.337229...°
        let expected = (2.0 + 20.0 / 60.0 + 14.025 / 3600.0_f64).to_radians();
        assert!((pm.longitude - expected).abs() < 1e-12);
        assert!(pm.identity.has_code(&CrsCode::epsg(8903)));
    }

    #[test]
    fn test_western_meridian_is_negative() {
        let pm = PrimeMeridian::from_proj_name("bogota", None).expect("bogota");
        assert!(pm.longitude < 0.0);
        assert!(pm.identity.has_code(&CrsCode::epsg(8904)));
    }

    #[test]
    fn test_unknown_meridian() {
        let err = PrimeMeridian::from_proj_name("atlantis", Some("4326".into())).unwrap_err();
        assert!(matches!(err, CrsError::UnknownPrimeMeridian { .. }));
    }

    #[test]
    fn test_catalog_codes_are_distinct() {
        let mut codes: Vec<&str> = MERIDIAN_CATALOG.iter().map(|e| e.epsg).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), MERIDIAN_CATALOG.len());
    }

    #[test]
    fn test_all_catalog_longitudes_parse() {
        for entry in MERIDIAN_CATALOG {
            let pm = PrimeMeridian::from_proj_name(entry.proj_name, None).expect(entry.proj_name);
            assert!(pm.longitude.abs() < std::f64::consts::PI);
        }
    }
}
