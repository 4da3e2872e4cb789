// crates/tr_crs/src/ellipsoid.rs

//! 椭球体定义与解析
//!
//! 固定目录收录 proj 约定的 40 余个命名椭球体；定义未命名椭球体时，
//! 从长半轴加一个形状参数（es/e/rf/f/b 五选一）派生。
//!
//! # 示例
//!
//! ```
//! use tr_crs::ellipsoid::Ellipsoid;
//!
//! let grs80 = Ellipsoid::from_proj_name("GRS80").unwrap();
//! assert!((grs80.semi_major - 6_378_137.0).abs() < 1e-6);
//! assert!((grs80.eccentricity() - 0.081819191).abs() < 1e-9);
//! ```

use crate::code::{CrsCode, Identity};
use crate::error::{CrsError, CrsResult};
use crate::params::ParamMap;
use crate::store::ResolveContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 扁率阈值：小于该值的扁率不可安全求逆，按球体处理
const FLATTENING_EPSILON: f64 = 1e-6;

// ============================================================================
// 形状参数
// ============================================================================

/// 椭球体形状参数
///
/// 三种参数化互斥，有且仅有一种是权威来源；其余几何量由其派生。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EllipsoidShape {
    /// 短半轴 (m)
    SemiMinorAxis(f64),
    /// 第一偏心率
    Eccentricity(f64),
    /// 扁率倒数 1/f
    InverseFlattening(f64),
}

// ============================================================================
// 椭球体
// ============================================================================

/// 地球椭球体
///
/// 长半轴以米计；短半轴等于长半轴时退化为球体。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// 长半轴 (m)，恒为正
    pub semi_major: f64,
    /// 权威形状参数
    pub shape: EllipsoidShape,
    /// 标识元数据
    pub identity: Identity,
}

impl Ellipsoid {
    /// 创建椭球体
    #[must_use]
    pub fn new(semi_major: f64, shape: EllipsoidShape, identity: Identity) -> Self {
        Self {
            semi_major,
            shape,
            identity,
        }
    }

    /// 球体（短半轴 = 长半轴）
    #[must_use]
    pub fn sphere(radius: f64, identity: Identity) -> Self {
        Self::new(radius, EllipsoidShape::SemiMinorAxis(radius), identity)
    }

    /// 短半轴 b
    #[must_use]
    pub fn semi_minor(&self) -> f64 {
        match self.shape {
            EllipsoidShape::SemiMinorAxis(b) => b,
            EllipsoidShape::Eccentricity(e) => self.semi_major * (1.0 - e * e).sqrt(),
            EllipsoidShape::InverseFlattening(rf) => self.semi_major * (1.0 - 1.0 / rf),
        }
    }

    /// 扁率 f = (a-b)/a
    #[must_use]
    pub fn flattening(&self) -> f64 {
        match self.shape {
            EllipsoidShape::SemiMinorAxis(b) => (self.semi_major - b) / self.semi_major,
            EllipsoidShape::Eccentricity(e) => 1.0 - (1.0 - e * e).sqrt(),
            EllipsoidShape::InverseFlattening(rf) => 1.0 / rf,
        }
    }

    /// 扁率倒数 1/f，球体返回 `None`
    #[must_use]
    pub fn inverse_flattening(&self) -> Option<f64> {
        if let EllipsoidShape::InverseFlattening(rf) = self.shape {
            return Some(rf);
        }
        let f = self.flattening();
        if f.abs() <= FLATTENING_EPSILON {
            None
        } else {
            Some(1.0 / f)
        }
    }

    /// 第一偏心率的平方 e² = 2f - f²
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        match self.shape {
            EllipsoidShape::Eccentricity(e) => e * e,
            _ => {
                let f = self.flattening();
                f * (2.0 - f)
            }
        }
    }

    /// 第一偏心率 e = √e²
    #[must_use]
    pub fn eccentricity(&self) -> f64 {
        match self.shape {
            EllipsoidShape::Eccentricity(e) => e,
            _ => self.eccentricity_squared().sqrt(),
        }
    }

    /// 是否退化为球体
    #[must_use]
    pub fn is_sphere(&self) -> bool {
        self.flattening().abs() <= FLATTENING_EPSILON
    }

    /// 按 proj 名称在固定目录中查找
    ///
    /// 名称匹配大小写不敏感。
    ///
    /// # Errors
    /// 名称不在目录中时返回 `UnknownEllipsoid`
    pub fn from_proj_name(name: &str) -> CrsResult<Self> {
        let trimmed = name.trim();
        let entry = ELLIPSOID_CATALOG
            .iter()
            .find(|e| e.proj_name.eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CrsError::unknown_ellipsoid(trimmed))?;

        let codes = match entry.epsg {
            Some(number) => CrsCode::epsg_aliases(number),
            None => vec![CrsCode::new(entry.proj_name)],
        };
        let shape = match entry.semi_minor {
            Some(b) => EllipsoidShape::SemiMinorAxis(b),
            // 目录条目二选一：无短半轴则必有扁率倒数
            None => EllipsoidShape::InverseFlattening(entry.inverse_flattening),
        };
        Ok(Self::new(
            entry.semi_major,
            shape,
            Identity::new(codes).with_name(entry.display_name),
        ))
    }
}

impl std::fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ellipsoid(a={}, b={:.4})",
            self.semi_major,
            self.semi_minor()
        )
    }
}

// ============================================================================
// 命名椭球体目录
// ============================================================================

/// 目录条目
struct CatalogEllipsoid {
    proj_name: &'static str,
    semi_major: f64,
    semi_minor: Option<f64>,
    inverse_flattening: f64,
    display_name: &'static str,
    epsg: Option<&'static str>,
}

const fn entry_rf(
    proj_name: &'static str,
    semi_major: f64,
    inverse_flattening: f64,
    display_name: &'static str,
    epsg: Option<&'static str>,
) -> CatalogEllipsoid {
    CatalogEllipsoid {
        proj_name,
        semi_major,
        semi_minor: None,
        inverse_flattening,
        display_name,
        epsg,
    }
}

const fn entry_b(
    proj_name: &'static str,
    semi_major: f64,
    semi_minor: f64,
    display_name: &'static str,
    epsg: Option<&'static str>,
) -> CatalogEllipsoid {
    CatalogEllipsoid {
        proj_name,
        semi_major,
        semi_minor: Some(semi_minor),
        inverse_flattening: 1.0,
        display_name,
        epsg,
    }
}

/// proj 约定的命名椭球体目录
static ELLIPSOID_CATALOG: &[CatalogEllipsoid] = &[
    entry_rf("APL4.9", 6_378_137.0, 298.25, "Appl. Physics. 1965", None),
    entry_rf("CPM", 6_375_738.7, 334.29, "Comm. des Poids et Mesures 1799", None),
    entry_rf("GRS67", 6_378_160.0, 298.247_167_427, "GRS 67(IUGG 1967)", Some("7036")),
    entry_rf("GRS80", 6_378_137.0, 298.257_222_101, "GRS 1980(IUGG, 1980)", Some("7019")),
    entry_rf("IAU76", 6_378_140.0, 298.257, "IAU 1976", None),
    entry_rf("MERIT", 6_378_137.0, 298.257, "MERIT 1983", None),
    entry_rf("NWL9D", 6_378_145.0, 298.25, "Naval Weapons Lab., 1965", None),
    entry_b("SEasia", 6_378_155.0, 6_356_773.320_5, "Southeast Asia", None),
    entry_rf("SGS85", 6_378_136.0, 298.257, "Soviet Geodetic System 85", None),
    entry_rf("WGS60", 6_378_165.0, 298.3, "WGS 60", None),
    entry_rf("WGS66", 6_378_145.0, 298.25, "WGS 66", None),
    entry_rf("WGS72", 6_378_135.0, 298.26, "WGS 72", Some("7043")),
    entry_rf("WGS84", 6_378_137.0, 298.257_223_563, "WGS 84", Some("7030")),
    entry_b("airy", 6_377_563.396, 6_356_256.910, "Airy 1830", Some("7001")),
    entry_rf("andrae", 6_377_104.43, 300.0, "Andrae 1876 (Den., Iclnd.)", None),
    entry_rf("aust_SA", 6_378_160.0, 298.25, "Australian Natl & S. Amer. 1969", Some("7050")),
    entry_rf("bess_nam", 6_377_483.865, 299.152_812_8, "Bessel 1841 (Namibia)", Some("7046")),
    entry_rf("bessel", 6_377_397.155, 299.152_812_8, "Bessel 1841", Some("7004")),
    entry_b("clrk66", 6_378_206.4, 6_356_583.8, "Clarke 1866", Some("7008")),
    entry_rf("clrk80", 6_378_249.145, 293.4663, "Clarke 1880 mod.", Some("7034")),
    entry_rf("delmbr", 6_376_428.0, 311.5, "Delambre 1810 (Belgium)", None),
    entry_rf("engelis", 6_378_136.05, 298.2566, "Engelis 1985", None),
    entry_rf("evrst30", 6_377_276.345, 300.8017, "Everest 1830", Some("7042")),
    entry_rf("evrst48", 6_377_304.063, 300.8017, "Everest 1948", Some("7018")),
    entry_rf("evrst56", 6_377_301.243, 300.8017, "Everest 1956", Some("7044")),
    entry_rf("evrst69", 6_377_295.664, 300.8017, "Everest 1969", Some("7056")),
    entry_rf("evrstSS", 6_377_298.556, 300.8017, "Everest (Sabah & Sarawak)", Some("7016")),
    entry_rf("fschr60", 6_378_166.0, 298.3, "Fischer (Mercury Datum) 1960", None),
    entry_rf("fschr60m", 6_378_155.0, 298.3, "Modified Fischer 1960", None),
    entry_rf("fschr68", 6_378_150.0, 298.3, "Fischer 1968", None),
    entry_rf("helmert", 6_378_200.0, 298.3, "Helmert 1906", Some("7020")),
    entry_rf("hough", 6_378_270.0, 297.0, "Hough", Some("7053")),
    entry_rf("intl", 6_378_388.0, 297.0, "International 1909 (Hayford)", Some("7022")),
    entry_rf("kaula", 6_378_163.0, 298.24, "Kaula 1961", None),
    entry_rf("krass", 6_378_245.0, 298.3, "Krassowsky, 1942", Some("7024")),
    entry_rf("lerch", 6_378_139.0, 298.257, "Lerch 1979", None),
    entry_b("mod_airy", 6_377_340.189, 6_356_034.446, "Modified Airy", Some("7002")),
    entry_rf("mprts", 6_397_300.0, 191.0, "Maupertius 1738", None),
    entry_b("new_intl", 6_378_157.5, 6_356_772.2, "New International 1967", Some("7036")),
    entry_b("plessis", 6_376_523.0, 6_355_863.0, "Plessis 1817 (France)", Some("7027")),
    entry_b("sphere", 6_370_997.0, 6_370_997.0, "Normal Sphere (r=6370997)", None),
    entry_b("walbeck", 6_376_896.0, 6_355_834.846_7, "Walbeck", None),
];

// ============================================================================
// 解析
// ============================================================================

/// 从参数表解析椭球体
///
/// 优先级（命中即消费对应键）：
/// 1. `ellps` 命名查表
/// 2. `R` 球体半径
/// 3. `a` + 形状参数五选一（es → e → rf → f → b），全缺省为球体
///
/// # Errors
/// - `UnknownEllipsoid`: `ellps` 名称不在目录中
/// - `MissingParameter`: 走派生路径但缺少长半轴 `a`
/// - `Format`: 数值文本无法解析
pub fn resolve_ellipsoid(
    params: &mut ParamMap,
    ctx: &mut ResolveContext<'_>,
) -> CrsResult<Ellipsoid> {
    let identifier = params.identifier();

    if let Some(name) = params.take_nonblank("ellps") {
        debug!(name, "按名称解析椭球体");
        let ellipsoid = Ellipsoid::from_proj_name(&name)?;
        ctx.record_ellipsoid(&ellipsoid);
        return Ok(ellipsoid);
    }

    let ellipsoid = if let Some(radius) = params.take_f64("R")? {
        debug!(radius, "定义给出半径而非椭球体，按球体处理");
        Ellipsoid::sphere(radius, synthesized_identity(ctx, identifier.as_deref()))
    } else {
        let semi_major = params
            .take_f64("a")?
            .ok_or_else(|| CrsError::missing_parameter("a", identifier.clone()))?;
        let shape = derive_shape(params, semi_major)?;
        Ellipsoid::new(
            semi_major,
            shape,
            synthesized_identity(ctx, identifier.as_deref()),
        )
    };
    ctx.record_ellipsoid(&ellipsoid);
    Ok(ellipsoid)
}

/// 形状参数五选一，按 es → e → rf → f → b 的优先级取第一个命中者
fn derive_shape(params: &mut ParamMap, semi_major: f64) -> CrsResult<EllipsoidShape> {
    if let Some(es) = params.take_f64("es")? {
        return Ok(EllipsoidShape::Eccentricity(es.sqrt()));
    }
    if let Some(e) = params.take_f64("e")? {
        return Ok(EllipsoidShape::Eccentricity(e));
    }
    if let Some(rf) = params.take_f64("rf")? {
        return Ok(EllipsoidShape::InverseFlattening(rf));
    }
    if let Some(f) = params.take_f64("f")? {
        if f.abs() > FLATTENING_EPSILON {
            return Ok(EllipsoidShape::InverseFlattening(1.0 / f));
        }
        debug!(flattening = f, "扁率过小无法求逆，按球体处理");
        return Ok(EllipsoidShape::SemiMinorAxis(semi_major));
    }
    if let Some(b) = params.take_f64("b")? {
        return Ok(EllipsoidShape::SemiMinorAxis(b));
    }
    debug!("仅给出长半轴，按球体处理");
    Ok(EllipsoidShape::SemiMinorAxis(semi_major))
}

fn synthesized_identity(ctx: &mut ResolveContext<'_>, identifier: Option<&str>) -> Identity {
    Identity::single(CrsCode::new(ctx.counters.next_ellipsoid()))
        .with_name("Proj4 defined ellipsoid")
        .with_version(ctx.version.to_string())
        .with_description(format!(
            "Handmade proj4 ellipsoid definition (parsed from nad/epsg) used by crs with id: {}",
            identifier.unwrap_or("unknown")
        ))
        .with_area_of_use("Unknown")
}

// ============================================================================
// 测试
// ============================================================================
