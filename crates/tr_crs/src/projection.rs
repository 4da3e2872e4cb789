// crates/tr_crs/src/projection.rs

//! 投影分发
//!
//! 识别 PROJ4 约定的约 120 个投影短名，但只为已实现的子集构造对象：
//! Lambert 方位等积 (`laea`)、Lambert 等角圆锥 (`lcc`)、斜轴/替代
//! 立体投影 (`stere`/`sterea`)、横轴墨卡托与 UTM (`tmerc`/`utm`)。
//! 已识别未实现与完全未知两种情况都报 `UnsupportedProjection`，
//! 对外错误文本一致，内部可通过 [`is_recognized`] 区分。

use crate::angle::{parse_angle, AngleUnit};
use crate::error::{CrsError, CrsResult};
use crate::params::ParamMap;
use crate::units::{resolve_unit, UnitOfMeasure};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// 投影参数
// ============================================================================

/// 各投影共用的数值参数
///
/// 角度以弧度计，假东/假北以给定单位计。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// 自然原点经度 (rad)
    pub origin_longitude: f64,
    /// 自然原点纬度 (rad)
    pub origin_latitude: f64,
    /// 第一标准纬线 (rad)
    pub first_parallel: Option<f64>,
    /// 第二标准纬线 (rad)
    pub second_parallel: Option<f64>,
    /// 真比例纬线 (rad)
    pub true_scale_latitude: Option<f64>,
    /// 假东
    pub false_easting: f64,
    /// 假北
    pub false_northing: f64,
    /// 比例因子
    pub scale: f64,
    /// 坐标轴线性单位
    pub unit: UnitOfMeasure,
}

/// 横轴墨卡托的两种构造方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransverseMercator {
    /// 按 UTM 分带构造，忽略通用假原点/比例参数
    Zone {
        /// 分带号
        zone: u32,
        /// 是否北半球
        northern: bool,
        /// 坐标轴线性单位
        unit: UnitOfMeasure,
    },
    /// 按通用参数构造
    General {
        /// 是否北半球
        northern: bool,
        /// 通用参数
        params: ProjectionParams,
    },
}

/// 已实现的投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Lambert 方位等积 (`laea`)
    LambertAzimuthalEqualArea(ProjectionParams),
    /// Lambert 等角圆锥 (`lcc`)
    LambertConformalConic(ProjectionParams),
    /// 斜轴立体投影 (`stere`)
    StereographicAzimuthal(ProjectionParams),
    /// 替代立体投影 (`sterea`)
    StereographicAlternative(ProjectionParams),
    /// 横轴墨卡托 (`tmerc`/`utm`)
    TransverseMercator(TransverseMercator),
}

impl Projection {
    /// 投影坐标轴的线性单位
    #[must_use]
    pub fn unit(&self) -> &UnitOfMeasure {
        match self {
            Self::LambertAzimuthalEqualArea(p)
            | Self::LambertConformalConic(p)
            | Self::StereographicAzimuthal(p)
            | Self::StereographicAlternative(p)
            | Self::TransverseMercator(TransverseMercator::General { params: p, .. }) => &p.unit,
            Self::TransverseMercator(TransverseMercator::Zone { unit, .. }) => unit,
        }
    }

    /// PROJ4 短名
    #[must_use]
    pub fn proj_name(&self) -> &'static str {
        match self {
            Self::LambertAzimuthalEqualArea(_) => "laea",
            Self::LambertConformalConic(_) => "lcc",
            Self::StereographicAzimuthal(_) => "stere",
            Self::StereographicAlternative(_) => "sterea",
            Self::TransverseMercator(_) => "tmerc",
        }
    }
}

// ============================================================================
// 识别名称登记表
// ============================================================================

/// PROJ4 约定的投影短名与标题
///
/// 登记表之外的名称是完全未知的；表内未实现的名称同样报
/// `UnsupportedProjection`，但属于"已识别未实现"。
static RECOGNIZED_PROJECTIONS: &[(&str, &str)] = &[
    ("aea", "Albers Equal Area"),
    ("aeqd", "Azimuthal Equidistant"),
    ("airy", "Airy"),
    ("aitoff", "Aitoff"),
    ("alsk", "Mod. Stereographics of Alaska"),
    ("apian", "Apian Globular I"),
    ("august", "August Epicycloidal"),
    ("bacon", "Bacon Globular"),
    ("bipc", "Bipolar conic of western hemisphere"),
    ("boggs", "Boggs Eumorphic"),
    ("bonne", "Bonne (Werner lat_1=90)"),
    ("cass", "Cassini"),
    ("cc", "Central Cylindrical"),
    ("cea", "Equal Area Cylindrical"),
    ("chamb", "Chamberlin Trimetric"),
    ("collg", "Collignon"),
    ("crast", "Craster Parabolic (Putnins P4)"),
    ("denoy", "Denoyer Semi-Elliptical"),
    ("eck1", "Eckert I"),
    ("eck2", "Eckert II"),
    ("eck3", "Eckert III"),
    ("eck4", "Eckert IV"),
    ("eck5", "Eckert V"),
    ("eck6", "Eckert VI"),
    ("eqc", "Equidistant Cylindrical (Plate Caree)"),
    ("eqdc", "Equidistant Conic"),
    ("euler", "Euler"),
    ("fahey", "Fahey"),
    ("fouc", "Foucaut"),
    ("fouc_s", "Foucaut Sinusoidal"),
    ("gall", "Gall (Gall Stereographic)"),
    ("gins8", "Ginsburg VIII (TsNIIGAiK)"),
    ("gn_sinu", "General Sinusoidal Series"),
    ("gnom", "Gnomonic"),
    ("goode", "Goode Homolosine"),
    ("gs48", "Mod. Stererographics of 48 U.S."),
    ("gs50", "Mod. Stererographics of 50 U.S."),
    ("hammer", "Hammer & Eckert-Greifendorff"),
    ("hatano", "Hatano Asymmetrical Equal Area"),
    ("imw_p", "Internation Map of the World Polyconic"),
    ("kav5", "Kavraisky V"),
    ("kav7", "Kavraisky VII"),
    ("labrd", "Laborde"),
    ("laea", "Lambert Azimuthal Equal Area"),
    ("lagrng", "Lagrange"),
    ("larr", "Larrivee"),
    ("lask", "Laskowski"),
    ("latlong", "Lat/Long"),
    ("lcc", "Lambert Conformal Conic"),
    ("leac", "Lambert Equal Area Conic"),
    ("lee_os", "Lee Oblated Stereographic"),
    ("loxim", "Loximuthal"),
    ("lsat", "Space oblique for LANDSAT"),
    ("mbt_s", "McBryde-Thomas Flat-Polar Sine"),
    ("mbt_fps", "McBryde-Thomas Flat-Pole Sine (No. 2)"),
    ("mbtfpp", "McBride-Thomas Flat-Polar Parabolic"),
    ("mbtfpq", "McBryde-Thomas Flat-Polar Quartic"),
    ("mbtfps", "McBryde-Thomas Flat-Polar Sinusoidal"),
    ("merc", "Mercator"),
    ("mil_os", "Miller Oblated Stereographic"),
    ("mill", "Miller Cylindrical"),
    ("mpoly", "Modified Polyconic"),
    ("moll", "Mollweide"),
    ("murd1", "Murdoch I"),
    ("murd2", "Murdoch II"),
    ("murd3", "Murdoch III"),
    ("nell", "Nell"),
    ("nell_h", "Nell-Hammer"),
    ("nicol", "Nicolosi Globular"),
    ("nsper", "Near-sided perspective"),
    ("nzmg", "New Zealand Map Grid"),
    ("ob_tran", "General Oblique Transformation"),
    ("ocea", "Oblique Cylindrical Equal Area"),
    ("oea", "Oblated Equal Area"),
    ("omerc", "Oblique Mercator"),
    ("ortel", "Ortelius Oval"),
    ("ortho", "Orthographic"),
    ("pconic", "Perspective Conic"),
    ("poly", "Polyconic (American)"),
    ("putp1", "Putnins P1"),
    ("putp2", "Putnins P2"),
    ("putp3", "Putnins P3"),
    ("putp3p", "Putnins P3'"),
    ("putp4p", "Putnins P4'"),
    ("putp5", "Putnins P5"),
    ("putp5p", "Putnins P5'"),
    ("putp6", "Putnins P6"),
    ("putp6p", "Putnins P6'"),
    ("qua_aut", "Quartic Authalic"),
    ("robin", "Robinson"),
    ("rpoly", "Rectangular Polyconic"),
    ("sinu", "Sinusoidal (Sanson-Flamsteed)"),
    ("somerc", "Swiss. Obl. Mercator"),
    ("stere", "Oblique Stereographic Alternative"),
    ("sterea", "Stereographic Alternative"),
    ("tcc", "Transverse Central Cylindrical"),
    ("tcea", "Transverse Cylindrical Equal Area"),
    ("tissot", "Tissot Conic"),
    ("tmerc", "Transverse Mercator"),
    ("tpeqd", "Two Point Equidistant"),
    ("tpers", "Tilted perspective"),
    ("ups", "Universal Polar Stereographic"),
    ("urm5", "Urmaev V"),
    ("urmfps", "Urmaev Flat-Polar Sinusoidal"),
    ("utm", "Universal Transverse Mercator (UTM)"),
    ("vandg", "van der Grinten (I)"),
    ("vandg2", "van der Grinten II"),
    ("vandg3", "van der Grinten III"),
    ("vandg4", "van der Grinten IV"),
    ("vitk1", "Vitkovsky I"),
    ("wag1", "Wagner I (Kavraisky VI)"),
    ("wag2", "Wagner II"),
    ("wag3", "Wagner III"),
    ("wag4", "Wagner IV"),
    ("wag5", "Wagner V"),
    ("wag6", "Wagner VI"),
    ("wag7", "Wagner VII"),
    ("weren", "Werenskiold I"),
    ("wink1", "Winkel I"),
    ("wink2", "Winkel II"),
    ("wintri", "Winkel Tripel"),
];

/// 短名是否在识别登记表内
#[must_use]
pub fn is_recognized(name: &str) -> bool {
    RECOGNIZED_PROJECTIONS
        .iter()
        .any(|(proj, _)| *proj == name.trim())
}

// ============================================================================
// 解析
// ============================================================================

/// 从参数表解析投影
///
/// 先消费通用数值参数（原点经纬度、标准纬线、假原点、比例、单位），
/// 再按短名分发。`tmerc`/`utm` 给出 `zone` 时按分带构造，
/// 忽略通用假原点/比例参数。
///
/// # Errors
/// - `UnsupportedProjection`: 短名未实现或完全未知
/// - `UnknownUnit`/`Format`: 单位或数值参数非法
pub fn resolve_projection(name: &str, params: &mut ParamMap) -> CrsResult<Projection> {
    let origin_latitude = take_angle(params, "lat_0")?.unwrap_or(0.0);
    let origin_longitude = take_angle(params, "lon_0")?.unwrap_or(0.0);
    let first_parallel = take_angle(params, "lat_1")?;
    let second_parallel = take_angle(params, "lat_2")?;
    let true_scale_latitude = take_angle(params, "lat_ts")?;
    let false_northing = params.take_f64("y_0")?.unwrap_or(0.0);
    let false_easting = params.take_f64("x_0")?.unwrap_or(0.0);
    let scale = match params.take_f64("k_0")? {
        Some(k) => k,
        None => params.take_f64("k")?.unwrap_or(1.0),
    };
    let unit = resolve_unit(params)?;

    let common = ProjectionParams {
        origin_longitude,
        origin_latitude,
        first_parallel,
        second_parallel,
        true_scale_latitude,
        false_easting,
        false_northing,
        scale,
        unit,
    };

    let name = name.trim();
    let projection = match name {
        "laea" => Projection::LambertAzimuthalEqualArea(common),
        "lcc" => Projection::LambertConformalConic(common),
        "stere" => Projection::StereographicAzimuthal(common),
        "sterea" => Projection::StereographicAlternative(common),
        "tmerc" | "utm" => {
            let northern = params.take_nonblank("south").is_none();
            match params.take_nonblank("zone") {
                Some(text) => {
                    let zone = text.parse::<u32>().map_err(|e| {
                        CrsError::format(text.as_str(), format!("不是有效的分带号: {e}"))
                    })?;
                    Projection::TransverseMercator(TransverseMercator::Zone {
                        zone,
                        northern,
                        unit: common.unit,
                    })
                }
                None => Projection::TransverseMercator(TransverseMercator::General {
                    northern,
                    params: common,
                }),
            }
        }
        other => {
            if is_recognized(other) {
                debug!(name = other, "投影已识别但未实现");
            } else {
                debug!(name = other, "投影名称未知");
            }
            return Err(CrsError::unsupported_projection(other));
        }
    };
    Ok(projection)
}

fn take_angle(params: &mut ParamMap, key: &str) -> CrsResult<Option<f64>> {
    match params.take_nonblank(key) {
        None => Ok(None),
        Some(text) => parse_angle(&text, AngleUnit::Radians).map(Some),
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        ParamMap::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        )
    }

    #[test]
    fn test_utm_zone_ignores_generic_parameters() {
        let mut p = params(&[
            ("zone", "32"),
            ("x_0", "500000"),
            ("y_0", "100000"),
            ("k_0", "0.5"),
        ]);
        let proj = resolve_projection("tmerc", &mut p).expect("tmerc");
        match proj {
            Projection::TransverseMercator(TransverseMercator::Zone { zone, northern, .. }) => {
                assert_eq!(zone, 32);
                assert!(northern);
            }
            other => panic!("应为分带构造: {other:?}"),
        }
    }

    #[test]
    fn test_tmerc_south_flag() {
        let mut p = params(&[("zone", "17"), ("south", "true")]);
        let proj = resolve_projection("utm", &mut p).expect("utm");
        match proj {
            Projection::TransverseMercator(TransverseMercator::Zone { northern, .. }) => {
                assert!(!northern);
            }
            other => panic!("应为分带构造: {other:?}"),
        }
    }

    #[test]
    fn test_tmerc_general_parameters() {
        let mut p = params(&[
            ("lat_0", "0"),
            ("lon_0", "9"),
            ("x_0", "3500000"),
            ("k_0", "1"),
        ]);
        let proj = resolve_projection("tmerc", &mut p).expect("tmerc");
        match proj {
            Projection::TransverseMercator(TransverseMercator::General { northern, params }) => {
                assert!(northern);
                assert_eq!(params.false_easting, 3_500_000.0);
                assert!((params.origin_longitude - 9.0_f64.to_radians()).abs() < 1e-12);
            }
            other => panic!("应为通用构造: {other:?}"),
        }
    }

    #[test]
    fn test_lcc_standard_parallels() {
        let mut p = params(&[("lat_1", "49"), ("lat_2", "77"), ("lon_0", "-95")]);
        let proj = resolve_projection("lcc", &mut p).expect("lcc");
        match proj {
            Projection::LambertConformalConic(params) => {
                assert!((params.first_parallel.expect("lat_1") - 49.0_f64.to_radians()).abs() < 1e-12);
                assert!((params.second_parallel.expect("lat_2") - 77.0_f64.to_radians()).abs() < 1e-12);
                assert!(params.true_scale_latitude.is_none());
            }
            other => panic!("应为 lcc: {other:?}"),
        }
    }

    #[test]
    fn test_stere_true_scale_latitude() {
        let mut p = params(&[("lat_ts", "70"), ("lat_0", "90")]);
        let proj = resolve_projection("stere", &mut p).expect("stere");
        match proj {
            Projection::StereographicAzimuthal(params) => {
                assert!((params.true_scale_latitude.expect("lat_ts") - 70.0_f64.to_radians()).abs() < 1e-12);
            }
            other => panic!("应为 stere: {other:?}"),
        }
    }

    #[test]
    fn test_scale_factor_two_names() {
        let mut p = params(&[("k_0", "0.9996")]);
        match resolve_projection("laea", &mut p).expect("laea") {
            Projection::LambertAzimuthalEqualArea(params) => assert_eq!(params.scale, 0.9996),
            other => panic!("应为 laea: {other:?}"),
        }

        let mut p = params(&[("k", "0.9999")]);
        match resolve_projection("laea", &mut p).expect("laea") {
            Projection::LambertAzimuthalEqualArea(params) => assert_eq!(params.scale, 0.9999),
            other => panic!("应为 laea: {other:?}"),
        }

        // 缺省为 1
        let mut p = params(&[]);
        match resolve_projection("laea", &mut p).expect("laea") {
            Projection::LambertAzimuthalEqualArea(params) => assert_eq!(params.scale, 1.0),
            other => panic!("应为 laea: {other:?}"),
        }
    }

    #[test]
    fn test_recognized_but_unimplemented() {
        // merc 在登记表内但未实现
        assert!(is_recognized("merc"));
        let mut p = params(&[]);
        let err = resolve_projection("merc", &mut p).unwrap_err();
        assert!(matches!(err, CrsError::UnsupportedProjection { .. }));
    }

    #[test]
    fn test_truly_unknown_projection() {
        // 完全未知的名称报同一种错误
        assert!(!is_recognized("made_up_projection"));
        let mut p = params(&[]);
        let err = resolve_projection("made_up_projection", &mut p).unwrap_err();
        assert!(matches!(err, CrsError::UnsupportedProjection { .. }));
    }

    #[test]
    fn test_projection_unit_passthrough() {
        let mut p = params(&[("zone", "11"), ("units", "us-ft")]);
        let proj = resolve_projection("utm", &mut p).expect("utm");
        assert!((proj.unit().scale - 1200.0 / 3937.0).abs() < 1e-15);
    }

    #[test]
    fn test_bad_zone_number() {
        let mut p = params(&[("zone", "abc")]);
        assert!(matches!(
            resolve_projection("tmerc", &mut p).unwrap_err(),
            CrsError::Format { .. }
        ));
    }
}
