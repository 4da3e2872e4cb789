// crates/tr_crs/src/datum.rs

//! 大地基准定义与解析
//!
//! 固定目录收录 proj 约定的命名基准，每个条目携带到 WGS84 的
//! Helmert 七参数（部分条目只有平移三参数）与缺省椭球体。
//! `potsdam` 是双值条目：按所属 CRS 编号选择 DHDN 历史参数集
//! 或 RD/83 参数集。定义未命名基准时从椭球体与本初子午线合成，
//! 不携带 Helmert 变换（视同与 WGS84 重合）。

use crate::code::{CrsCode, Identity};
use crate::ellipsoid::{resolve_ellipsoid, Ellipsoid};
use crate::error::{CrsError, CrsResult};
use crate::meridian::{resolve_prime_meridian, PrimeMeridian};
use crate::params::ParamMap;
use crate::store::ResolveContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Helmert 变换
// ============================================================================

/// 到 WGS84 的 Helmert 七参数变换
///
/// 平移以米计，旋转以角秒计，尺度以 ppm 计。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Helmert {
    /// X 平移 (m)
    pub dx: f64,
    /// Y 平移 (m)
    pub dy: f64,
    /// Z 平移 (m)
    pub dz: f64,
    /// X 旋转 (arc-second)
    pub rx: f64,
    /// Y 旋转 (arc-second)
    pub ry: f64,
    /// Z 旋转 (arc-second)
    pub rz: f64,
    /// 尺度差 (ppm)
    pub ppm: f64,
    /// 标识元数据
    pub identity: Identity,
}

impl Helmert {
    /// 创建七参数变换
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        dx: f64,
        dy: f64,
        dz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        ppm: f64,
        identity: Identity,
    ) -> Self {
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
            ppm,
            identity,
        }
    }

    /// 仅平移的三参数变换（旋转与尺度为零）
    #[must_use]
    pub fn translation(dx: f64, dy: f64, dz: f64, identity: Identity) -> Self {
        Self::new(dx, dy, dz, 0.0, 0.0, 0.0, 0.0, identity)
    }

    /// 所有参数是否均为零（恒等变换）
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.dx == 0.0
            && self.dy == 0.0
            && self.dz == 0.0
            && self.rx == 0.0
            && self.ry == 0.0
            && self.rz == 0.0
            && self.ppm == 0.0
    }
}

// ============================================================================
// 大地基准
// ============================================================================

/// 大地基准
///
/// `to_wgs84` 为 `None` 时视同与 WGS84 重合。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodeticDatum {
    /// 参考椭球体
    pub ellipsoid: Ellipsoid,
    /// 本初子午线
    pub prime_meridian: PrimeMeridian,
    /// 到 WGS84 的 Helmert 变换
    pub to_wgs84: Option<Helmert>,
    /// 标识元数据
    pub identity: Identity,
}

impl GeodeticDatum {
    /// 创建大地基准
    #[must_use]
    pub fn new(
        ellipsoid: Ellipsoid,
        prime_meridian: PrimeMeridian,
        to_wgs84: Option<Helmert>,
        identity: Identity,
    ) -> Self {
        Self {
            ellipsoid,
            prime_meridian,
            to_wgs84,
            identity,
        }
    }

    /// WGS84 基准 (EPSG:6326)
    ///
    /// # Errors
    /// 不会失败；签名仅为与目录查找保持一致
    pub fn wgs84() -> CrsResult<Self> {
        Ok(Self::new(
            Ellipsoid::from_proj_name("WGS84")?,
            PrimeMeridian::greenwich(),
            None,
            Identity::new(CrsCode::epsg_aliases("6326")).with_name("World Geodetic System 1984"),
        ))
    }
}

// ============================================================================
// 解析
// ============================================================================

/// 从参数表解析大地基准
///
/// `datum` 存在时按名称查目录（忽略 `pm`，命名基准固定使用格林尼治）；
/// 缺失或空白时从椭球体与本初子午线合成未命名基准。
/// `crs_id` 为所属 CRS 的数字编号文本，仅 `potsdam` 双值条目使用。
///
/// # Errors
/// - `UnknownDatum`: `datum` 名称不在目录中
/// - 椭球体/子午线解析错误向上传播
pub fn resolve_datum(
    params: &mut ParamMap,
    crs_id: Option<&str>,
    ctx: &mut ResolveContext<'_>,
) -> CrsResult<GeodeticDatum> {
    let datum = match params.take_nonblank("datum") {
        Some(name) => {
            debug!(name, "按名称解析大地基准");
            let defined_ellps = params.take_nonblank("ellps");
            named_datum(&name, defined_ellps.as_deref(), crs_id)?
                .ok_or_else(|| CrsError::unknown_datum(&name, params.identifier()))?
        }
        None => {
            let ellipsoid = resolve_ellipsoid(params, ctx)?;
            let prime_meridian = resolve_prime_meridian(params, ctx)?;
            let identity = Identity::single(CrsCode::new(ctx.counters.next_datum()))
                .with_name("Proj4 defined datum")
                .with_version(ctx.version.to_string())
                .with_description(format!(
                    "Handmade proj4 datum definition (parsed from nad/epsg) used by crs with id: {}",
                    params.identifier().as_deref().unwrap_or("unknown")
                ))
                .with_area_of_use("Unknown");
            GeodeticDatum::new(ellipsoid, prime_meridian, None, identity)
        }
    };
    ctx.record_datum(&datum);
    Ok(datum)
}

/// 命名基准目录查找
///
/// 返回 `None` 表示名称不在目录中（与"缺失"区分由调用方负责）。
fn named_datum(
    name: &str,
    defined_ellps: Option<&str>,
    crs_id: Option<&str>,
) -> CrsResult<Option<GeodeticDatum>> {
    let ellipsoid = |default: &str| -> CrsResult<Ellipsoid> {
        Ellipsoid::from_proj_name(defined_ellps.unwrap_or(default))
    };

    let datum = if name.eq_ignore_ascii_case("GGRS87") {
        GeodeticDatum::new(
            ellipsoid("GRS80")?,
            PrimeMeridian::greenwich(),
            Some(Helmert::translation(
                -199.87,
                74.79,
                246.62,
                Identity::new(CrsCode::epsg_aliases("1272")),
            )),
            Identity::new(CrsCode::epsg_aliases("6121"))
                .with_name("Greek_Geodetic_Reference_System_1987"),
        )
    } else if name.eq_ignore_ascii_case("NAD27") {
        GeodeticDatum::new(
            ellipsoid("clrk66")?,
            PrimeMeridian::greenwich(),
            Some(Helmert::translation(
                -8.0,
                160.0,
                176.0,
                Identity::new(CrsCode::epsg_aliases("1173")),
            )),
            Identity::new(CrsCode::epsg_aliases("6267")).with_name("North_American_Datum_1927"),
        )
    } else if name.eq_ignore_ascii_case("NAD83") {
        // NAD83 与 WGS84 视同重合，七参数全零
        GeodeticDatum::new(
            ellipsoid("GRS80")?,
            PrimeMeridian::greenwich(),
            Some(Helmert::translation(
                0.0,
                0.0,
                0.0,
                Identity::new(CrsCode::epsg_aliases("1188"))
                    .with_description("Derived at 312 stations.")
                    .with_area_of_use("North America - all Canada and USA subunits"),
            )),
            Identity::new(CrsCode::epsg_aliases("6269")).with_name("North_American_Datum_1983"),
        )
    } else if name.eq_ignore_ascii_case("OSGB36") {
        GeodeticDatum::new(
            ellipsoid("airy")?,
            PrimeMeridian::greenwich(),
            Some(Helmert::new(
                446.448,
                -125.157,
                542.060,
                0.1502,
                0.2470,
                0.8421,
                -20.4894,
                Identity::new(CrsCode::epsg_aliases("1314"))
                    .with_area_of_use("United Kingdom (UK) - Great Britain and UKCS"),
            )),
            Identity::new(CrsCode::epsg_aliases("6001")).with_name("Airy 1830"),
        )
    } else if name.eq_ignore_ascii_case("WGS84") {
        GeodeticDatum::wgs84()?
    } else if name.eq_ignore_ascii_case("carthage") {
        GeodeticDatum::new(
            ellipsoid("clrk80")?,
            PrimeMeridian::greenwich(),
            Some(Helmert::translation(
                -263.0,
                6.0,
                431.0,
                Identity::new(CrsCode::epsg_aliases("1130"))
                    .with_description("Derived at 5 stations.")
                    .with_area_of_use("Tunisia"),
            )),
            Identity::new(CrsCode::epsg_aliases("6816")).with_name("Carthage 1934 Tunisia"),
        )
    } else if name.eq_ignore_ascii_case("hermannskogel") {
        GeodeticDatum::new(
            ellipsoid("bessel")?,
            PrimeMeridian::greenwich(),
            Some(Helmert::translation(
                653.0,
                -212.0,
                449.0,
                Identity::new(vec![CrsCode::new("kogel"), CrsCode::epsg(1306)]),
            )),
            Identity::single(CrsCode::new("Hermannskogel")).with_name("Hermannskogel"),
        )
    } else if name.eq_ignore_ascii_case("ire65") {
        GeodeticDatum::new(
            ellipsoid("mod_airy")?,
            PrimeMeridian::greenwich(),
            Some(Helmert::new(
                482.530,
                -130.596,
                564.557,
                -1.042,
                -0.214,
                -0.631,
                8.15,
                Identity::single(CrsCode::new("ire65_conversion")),
            )),
            Identity::single(CrsCode::new("Ireland 1965")).with_name("Ireland 1965"),
        )
    } else if name.eq_ignore_ascii_case("nzgd49") {
        GeodeticDatum::new(
            ellipsoid("intl")?,
            PrimeMeridian::greenwich(),
            Some(Helmert::new(
                59.47,
                -5.04,
                187.44,
                0.47,
                -0.1,
                1.024,
                -4.5993,
                Identity::new(CrsCode::epsg_aliases("1564"))
                    .with_name("NZGD49 to WGS 84 (2)")
                    .with_area_of_use("New Zealand"),
            )),
            Identity::new(CrsCode::epsg_aliases("6272"))
                .with_name("New Zealand Geodetic Datum 1949"),
        )
    } else if name.eq_ignore_ascii_case("potsdam") {
        potsdam_datum(defined_ellps, crs_id)?
    } else {
        return Ok(None);
    };
    Ok(Some(datum))
}

/// 适用 DHDN 历史参数集的 CRS 编号
const DHDN_CRS_IDS: &[&str] = &["3068", "4314", "31466", "31467", "31468", "31469"];

/// potsdam 双值条目
///
/// 所属 CRS 属于德国历史格网编号集时用 DHDN 参数集，否则用 RD/83。
fn potsdam_datum(defined_ellps: Option<&str>, crs_id: Option<&str>) -> CrsResult<GeodeticDatum> {
    let ellipsoid = Ellipsoid::from_proj_name(defined_ellps.unwrap_or("bessel"))?;
    let use_dhdn = crs_id.is_some_and(|id| DHDN_CRS_IDS.contains(&id));
    let datum = if use_dhdn {
        GeodeticDatum::new(
            ellipsoid,
            PrimeMeridian::greenwich(),
            Some(Helmert::new(
                598.1,
                73.7,
                418.2,
                0.202,
                0.045,
                -2.455,
                6.7,
                Identity::new(CrsCode::epsg_aliases("1777"))
                    .with_name("DHDN to WGS 84")
                    .with_area_of_use(
                        "Germany - states of former West Germany - Baden-Wurtemberg, Bayern, \
                         Hessen, Niedersachsen, Nordrhein-Westfalen, Rheinland-Pfalz, Saarland, \
                         Schleswig-Holstein.",
                    ),
            )),
            Identity::new(CrsCode::epsg_aliases("6314"))
                .with_name("Deutsches Hauptdreiecksnetz")
                .with_version("2006-06-12")
                .with_description(
                    "Fundamental point: Rauenberg. Latitude: 52 deg 27 min 12.021 sec N; \
                     Longitude: 13 deg 22 min 04.928 sec E (of Greenwich). This station was \
                     destroyed in 1910 and the station at Potsdam substituted as the fundamental \
                     point.",
                ),
        )
    } else {
        GeodeticDatum::new(
            ellipsoid,
            PrimeMeridian::greenwich(),
            Some(Helmert::translation(
                606.0,
                23.0,
                413.0,
                Identity::new(CrsCode::epsg_aliases("15955"))
                    .with_name("RD/83 to WGS 84 (1)")
                    .with_area_of_use("Germany-Sachsen"),
            )),
            Identity::new(CrsCode::epsg_aliases("6746")).with_name("Potsdam Rauenberg 1950 DHDN"),
        )
    };
    Ok(datum)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::IdCounters;

    fn resolve(pairs: &[(&str, &str)], crs_id: Option<&str>) -> CrsResult<GeodeticDatum> {
        let mut params = ParamMap::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        );
        let mut counters = IdCounters::default();
        let mut ctx = ResolveContext::new(&mut counters, "2024-1-1T0:00");
        resolve_datum(&mut params, crs_id, &mut ctx)
    }

    #[test]
    fn test_wgs84_has_no_transform() {
        let datum = resolve(&[("datum", "WGS84")], None).expect("WGS84");
        assert!(datum.to_wgs84.is_none());
        assert!(datum.identity.has_code(&CrsCode::epsg(6326)));
    }

    #[test]
    fn test_ggrs87_translation() {
        let datum = resolve(&[("datum", "GGRS87")], None).expect("GGRS87");
        let helmert = datum.to_wgs84.expect("有变换");
        assert_eq!(helmert.dx, -199.87);
        assert_eq!(helmert.ppm, 0.0);
        assert!(helmert.identity.has_code(&CrsCode::epsg(1272)));
        // 缺省椭球体 GRS80
        assert!(datum.ellipsoid.identity.has_code(&CrsCode::epsg(7019)));
    }

    #[test]
    fn test_osgb36_seven_parameters() {
        let datum = resolve(&[("datum", "OSGB36")], None).expect("OSGB36");
        let helmert = datum.to_wgs84.expect("有变换");
        assert_eq!(helmert.rz, 0.8421);
        assert_eq!(helmert.ppm, -20.4894);
        assert!(!helmert.is_identity());
    }

    #[test]
    fn test_nad83_identity_transform() {
        let datum = resolve(&[("datum", "NAD83")], None).expect("NAD83");
        let helmert = datum.to_wgs84.expect("有变换");
        assert!(helmert.is_identity());
    }

    #[test]
    fn test_potsdam_two_valued() {
        // 德国历史格网编号: DHDN 参数集
        let dhdn = resolve(&[("datum", "potsdam")], Some("31467")).expect("potsdam");
        let helmert = dhdn.to_wgs84.expect("有变换");
        assert_eq!(helmert.dz, 418.2);
        assert!(helmert.identity.has_code(&CrsCode::epsg(1777)));
        assert!(dhdn.identity.has_code(&CrsCode::epsg(6314)));

        // 其它编号: RD/83 参数集
        let rd83 = resolve(&[("datum", "potsdam")], Some("4299")).expect("potsdam");
        let helmert = rd83.to_wgs84.expect("有变换");
        assert_eq!(helmert.dz, 413.0);
        assert!(helmert.identity.has_code(&CrsCode::epsg(15955)));
        assert!(rd83.identity.has_code(&CrsCode::epsg(6746)));

        // 无所属编号同样落到 RD/83
        let none = resolve(&[("datum", "potsdam")], None).expect("potsdam");
        assert_eq!(none.to_wgs84.expect("有变换").dz, 413.0);
    }

    #[test]
    fn test_ellps_override() {
        let datum = resolve(&[("datum", "potsdam"), ("ellps", "WGS84")], None).expect("potsdam");
        assert!(datum.ellipsoid.identity.has_code(&CrsCode::epsg(7030)));
    }

    #[test]
    fn test_unknown_datum_name() {
        let err = resolve(&[("datum", "no_such_datum")], None).unwrap_err();
        assert!(matches!(err, CrsError::UnknownDatum { .. }));
    }

    #[test]
    fn test_synthesized_datum() {
        let datum = resolve(&[("ellps", "bessel"), ("pm", "paris")], None).expect("合成基准");
        assert!(datum.to_wgs84.is_none());
        assert_eq!(
            datum.identity.primary_code().unwrap().as_str(),
            "DATUM_0"
        );
        assert!(datum.prime_meridian.longitude > 0.0);
    }

    #[test]
    fn test_named_datum_ignores_pm() {
        // 命名基准固定使用格林尼治
        let datum = resolve(&[("datum", "carthage"), ("pm", "paris")], None).expect("carthage");
        assert_eq!(datum.prime_meridian.longitude, 0.0);
    }
}
