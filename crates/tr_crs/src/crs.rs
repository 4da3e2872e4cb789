// crates/tr_crs/src/crs.rs

//! 坐标参照系组装
//!
//! 把参数表组装为地理或投影 CRS。PROJ4 不定义坐标轴顺序，
//! 一律按 xy 处理：地理 CRS 固定 [经度-东, 纬度-北]（弧度），
//! 投影 CRS 固定 [x-东, y-北]（投影单位）。

use crate::code::{CrsCode, Identity};
use crate::datum::{resolve_datum, GeodeticDatum};
use crate::error::{CrsError, CrsResult};
use crate::params::ParamMap;
use crate::projection::{resolve_projection, Projection};
use crate::store::ResolveContext;
use crate::units::UnitOfMeasure;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// 坐标轴
// ============================================================================

/// 坐标轴朝向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisDirection {
    /// 向东
    East,
    /// 向北
    North,
}

/// 坐标轴
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// 轴名称
    pub name: String,
    /// 朝向
    pub direction: AxisDirection,
    /// 量测单位
    pub unit: UnitOfMeasure,
}

impl Axis {
    /// 创建坐标轴
    #[must_use]
    pub fn new(name: impl Into<String>, direction: AxisDirection, unit: UnitOfMeasure) -> Self {
        Self {
            name: name.into(),
            direction,
            unit,
        }
    }
}

// ============================================================================
// CRS 类型
// ============================================================================

/// 地理坐标参照系
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicCrs {
    /// 大地基准
    pub datum: GeodeticDatum,
    /// 坐标轴，固定 [经度-东, 纬度-北]
    pub axes: [Axis; 2],
    /// 标识元数据
    pub identity: Identity,
}

/// 投影坐标参照系
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCrs {
    /// 投影
    pub projection: Projection,
    /// 底层地理 CRS
    pub base: GeographicCrs,
    /// 坐标轴，固定 [x-东, y-北]
    pub axes: [Axis; 2],
    /// 标识元数据
    pub identity: Identity,
}

/// 坐标参照系
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Crs {
    /// 地理 CRS
    Geographic(GeographicCrs),
    /// 投影 CRS
    Projected(ProjectedCrs),
}

impl Crs {
    /// 标识元数据
    #[must_use]
    pub fn identity(&self) -> &Identity {
        match self {
            Self::Geographic(crs) => &crs.identity,
            Self::Projected(crs) => &crs.identity,
        }
    }

    /// 大地基准（投影 CRS 取底层地理 CRS 的基准）
    #[must_use]
    pub fn datum(&self) -> &GeodeticDatum {
        match self {
            Self::Geographic(crs) => &crs.datum,
            Self::Projected(crs) => &crs.base.datum,
        }
    }

    /// 坐标轴
    #[must_use]
    pub fn axes(&self) -> &[Axis; 2] {
        match self {
            Self::Geographic(crs) => &crs.axes,
            Self::Projected(crs) => &crs.axes,
        }
    }
}

// ============================================================================
// 组装
// ============================================================================

/// 底层地理 CRS 固定为 EPSG:4314 的德国历史格网编号
const GERMAN_GRID_IDS: &[&str] = &["3068", "31466", "31467", "31468", "31469"];

/// 顶层入口：按 `proj` 参数组装坐标参照系
///
/// `proj=longlat` 组装地理 CRS，其余值作为投影短名组装投影 CRS。
///
/// # Errors
/// - `MissingParameter`: 定义缺少 `proj`
/// - 各子解析器错误向上传播
pub fn parse_coordinate_system(
    params: &mut ParamMap,
    ctx: &mut ResolveContext<'_>,
) -> CrsResult<Crs> {
    let proj = params
        .take_nonblank("proj")
        .ok_or_else(|| CrsError::missing_parameter("proj", params.identifier()))?;
    if proj == "longlat" {
        // 地理 CRS 自寻 id，无父投影 CRS
        Ok(Crs::Geographic(assemble_geographic(
            None, None, params, ctx,
        )?))
    } else {
        Ok(Crs::Projected(assemble_projected(&proj, params, ctx)?))
    }
}

/// 组装地理 CRS
///
/// `explicit_id` 为空时从定义自身的 `identifier` 参数派生 4 别名
/// code 集合；否则直接使用（不展开别名，用于合成 id 与 4314 覆盖）。
/// `projected_id` 为父投影 CRS 的数字编号，传入基准解析供
/// potsdam 双值条目选择参数集。
fn assemble_geographic(
    explicit_id: Option<&str>,
    projected_id: Option<&str>,
    params: &mut ParamMap,
    ctx: &mut ResolveContext<'_>,
) -> CrsResult<GeographicCrs> {
    let name = params
        .take_nonblank("comment")
        .unwrap_or_else(|| "Proj4 defined Geographic CRS".to_string());
    let mut description =
        String::from("Handmade proj4 geographic crs definition (parsed from nad/epsg).");

    let explicit_id = explicit_id.map(str::trim).filter(|id| !id.is_empty());
    let (codes, datum_context) = match explicit_id {
        // 顶层地理 CRS：id 即自身 identifier，展开为 4 别名；
        // 无 identifier 时发放合成 id
        None => match params.identifier() {
            Some(identifier) => (CrsCode::epsg_aliases(&identifier), Some(identifier)),
            None => (
                vec![CrsCode::new(ctx.counters.next_geographic())],
                None,
            ),
        },
        Some(id) => {
            description.push_str(&format!(
                " Used by projected crs with id: {}",
                projected_id.unwrap_or("unknown")
            ));
            (
                vec![CrsCode::new(id)],
                projected_id.map(str::to_string),
            )
        }
    };

    let datum = resolve_datum(params, datum_context.as_deref(), ctx)?;
    let crs = GeographicCrs {
        datum,
        axes: [
            Axis::new("longitude", AxisDirection::East, UnitOfMeasure::radian()),
            Axis::new("latitude", AxisDirection::North, UnitOfMeasure::radian()),
        ],
        identity: Identity::new(codes)
            .with_name(name)
            .with_version(ctx.version.to_string())
            .with_description(description)
            .with_area_of_use("Unknown"),
    };
    ctx.record_geographic(&crs);
    Ok(crs)
}

/// 组装投影 CRS
///
/// 先取走显示名 (`comment`)，再组装底层地理 CRS（除德国历史格网
/// 覆盖外使用合成 `GEO_CRS_<n>` id），最后分发投影。
fn assemble_projected(
    projection_name: &str,
    params: &mut ParamMap,
    ctx: &mut ResolveContext<'_>,
) -> CrsResult<ProjectedCrs> {
    let comment = params.take_nonblank("comment");
    let identifier = params.identifier();
    let codes = identifier
        .as_deref()
        .map(CrsCode::epsg_aliases)
        .unwrap_or_default();

    let geo_id = match identifier.as_deref() {
        Some(id) if GERMAN_GRID_IDS.contains(&id) => {
            debug!(id, "德国历史格网编号，底层地理 CRS 固定为 EPSG:4314");
            "EPSG:4314".to_string()
        }
        _ => ctx.counters.next_geographic(),
    };

    let base = assemble_geographic(Some(&geo_id), identifier.as_deref(), params, ctx)?;
    let projection = resolve_projection(projection_name, params)?;
    let unit = projection.unit().clone();

    let mut identity = Identity::new(codes)
        .with_version(ctx.version.to_string())
        .with_area_of_use("Unknown");
    if let Some(comment) = comment {
        identity = identity.with_name(comment);
    }

    Ok(ProjectedCrs {
        axes: [
            Axis::new("x", AxisDirection::East, unit.clone()),
            Axis::new("y", AxisDirection::North, unit),
        ],
        projection,
        base,
        identity,
    })
}

// ============================================================================
// 测试
// ============================================================================
