// crates/tr_crs/src/lib.rs
//! TerraRef 坐标参照系解析模块
//!
//! 把 PROJ4 风格的 `key=value` 定义解析为交叉引用的大地测量对象：
//! 椭球体、大地基准、本初子午线、投影以及地理/投影 CRS，
//! 每个对象携带一个或多个规范 EPSG 标识符。
//!
//! # 模块
//!
//! - `code`: 规范化标识符与 4 别名 EPSG 展开
//! - `params`: 带消费跟踪的参数表
//! - `angle`: 六十进制角度解析
//! - `units`: 量测单位
//! - `ellipsoid` / `meridian` / `datum`: 固定目录与解析器
//! - `projection`: 投影分发
//! - `crs`: 地理/投影 CRS 组装
//! - `store`: 记忆化仓库与外部目录协作方
//!
//! # 示例
//!
//! ```
//! use tr_crs::prelude::*;
//!
//! // 六十进制角度
//! let rad = parse_angle("2d20'14.025\"E", AngleUnit::Radians).unwrap();
//! assert!(rad > 0.0);
//!
//! // 目录椭球体
//! let bessel = Ellipsoid::from_proj_name("bessel").unwrap();
//! assert!(bessel.identity.has_code(&CrsCode::epsg(7004)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod angle;
pub mod code;
pub mod crs;
pub mod datum;
pub mod ellipsoid;
pub mod error;
pub mod meridian;
pub mod params;
pub mod projection;
pub mod store;
pub mod units;

/// 预导入模块
pub mod prelude {
    pub use crate::angle::{parse_angle, AngleUnit};
    pub use crate::code::{CrsCode, Identity};
    pub use crate::crs::{Axis, AxisDirection, Crs, GeographicCrs, ProjectedCrs};
    pub use crate::datum::{GeodeticDatum, Helmert};
    pub use crate::ellipsoid::{Ellipsoid, EllipsoidShape};
    pub use crate::error::{CrsError, CrsResult};
    pub use crate::meridian::PrimeMeridian;
    pub use crate::params::ParamMap;
    pub use crate::projection::Projection;
    pub use crate::store::{CrsResource, CrsStore, ProjSource, Transformation};
    pub use crate::units::UnitOfMeasure;
}

// 重导出常用类型
pub use code::{CrsCode, Identity};
pub use crs::{Crs, GeographicCrs, ProjectedCrs};
pub use datum::{GeodeticDatum, Helmert};
pub use ellipsoid::Ellipsoid;
pub use error::{CrsError, CrsResult};
pub use meridian::PrimeMeridian;
pub use params::ParamMap;
pub use projection::Projection;
pub use store::{CrsStore, ProjSource};
pub use units::UnitOfMeasure;
