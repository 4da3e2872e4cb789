// crates/tr_crs/src/store.rs

//! CRS 仓库
//!
//! 按 code 解析并记忆化 CRS 对象。原始定义由外部目录协作方
//! ([`ProjSource`]) 提供；解析成功的 CRS 按其携带的全部别名 code
//! 写入缓存，仓库存续期内不淘汰。缓存与四个合成 id 计数器由同一把
//! 互斥锁保护，整个解析路径持锁执行，保证每个规范 code 至多构造一次。

use crate::code::CrsCode;
use crate::crs::{parse_coordinate_system, Crs, GeographicCrs};
use crate::datum::{GeodeticDatum, Helmert};
use crate::ellipsoid::Ellipsoid;
use crate::error::{CrsError, CrsResult};
use crate::meridian::PrimeMeridian;
use crate::params::ParamMap;
use chrono::{Datelike, Local, Timelike};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// 合成 id 计数器
// ============================================================================

/// 每类实体一个的合成 id 计数器
///
/// 从 0 开始单调递增，仓库存续期内不得重置，否则产生 id 冲突。
#[derive(Debug, Default)]
pub struct IdCounters {
    ellipsoid: u64,
    datum: u64,
    geographic: u64,
    prime_meridian: u64,
}

impl IdCounters {
    /// 下一个椭球体合成 id
    pub fn next_ellipsoid(&mut self) -> String {
        let id = format!("ELLIPSOID_{}", self.ellipsoid);
        self.ellipsoid += 1;
        id
    }

    /// 下一个基准合成 id
    pub fn next_datum(&mut self) -> String {
        let id = format!("DATUM_{}", self.datum);
        self.datum += 1;
        id
    }

    /// 下一个地理 CRS 合成 id
    pub fn next_geographic(&mut self) -> String {
        let id = format!("GEO_CRS_{}", self.geographic);
        self.geographic += 1;
        id
    }

    /// 下一个本初子午线合成 id
    pub fn next_prime_meridian(&mut self) -> String {
        let id = format!("pm_{}", self.prime_meridian);
        self.prime_meridian += 1;
        id
    }
}

// ============================================================================
// 解析上下文
// ============================================================================

/// 单次解析期间构造的可检索实体
#[derive(Debug, Clone)]
pub enum CrsResource {
    /// 椭球体
    Ellipsoid(Ellipsoid),
    /// 大地基准
    Datum(GeodeticDatum),
    /// 本初子午线
    PrimeMeridian(PrimeMeridian),
    /// 坐标参照系
    Crs(Arc<Crs>),
}

/// 组装器的共享解析上下文
///
/// 携带合成 id 计数器与版本戳，并收集解析过程中构造的全部
/// 组件实体，供仓库并入资源缓存。
#[derive(Debug)]
pub struct ResolveContext<'a> {
    /// 合成 id 计数器
    pub counters: &'a mut IdCounters,
    /// 仓库版本戳
    pub version: &'a str,
    recorded: Vec<(CrsCode, CrsResource)>,
}

impl<'a> ResolveContext<'a> {
    /// 创建解析上下文
    #[must_use]
    pub fn new(counters: &'a mut IdCounters, version: &'a str) -> Self {
        Self {
            counters,
            version,
            recorded: Vec::new(),
        }
    }

    fn record(&mut self, codes: &[CrsCode], resource: &CrsResource) {
        for code in codes {
            self.recorded.push((code.clone(), resource.clone()));
        }
    }

    /// 记录解析出的椭球体
    pub fn record_ellipsoid(&mut self, ellipsoid: &Ellipsoid) {
        let resource = CrsResource::Ellipsoid(ellipsoid.clone());
        self.record(&ellipsoid.identity.codes, &resource);
    }

    /// 记录解析出的大地基准及其组件
    ///
    /// 目录命中的命名基准自带椭球体与子午线（不经过各自的解析器），
    /// 因此在这里一并记录，保证所有路径都能按 code 检索到组件。
    pub fn record_datum(&mut self, datum: &GeodeticDatum) {
        self.record_ellipsoid(&datum.ellipsoid);
        self.record_meridian(&datum.prime_meridian);
        let resource = CrsResource::Datum(datum.clone());
        self.record(&datum.identity.codes, &resource);
    }

    /// 记录解析出的本初子午线
    pub fn record_meridian(&mut self, meridian: &PrimeMeridian) {
        let resource = CrsResource::PrimeMeridian(meridian.clone());
        self.record(&meridian.identity.codes, &resource);
    }

    /// 记录组装出的地理 CRS
    pub fn record_geographic(&mut self, crs: &GeographicCrs) {
        let resource = CrsResource::Crs(Arc::new(Crs::Geographic(crs.clone())));
        self.record(&crs.identity.codes, &resource);
    }

    fn into_recorded(self) -> Vec<(CrsCode, CrsResource)> {
        self.recorded
    }
}

// ============================================================================
// 外部目录协作方
// ============================================================================

/// 外部目录提供的坐标变换记录
///
/// 仓库自身不求解变换，仅向协作方委托。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// 源 CRS code
    pub source: CrsCode,
    /// 目标 CRS code
    pub target: CrsCode,
    /// 变换参数（有则为 Helmert）
    pub helmert: Option<Helmert>,
}

/// 外部目录协作方
///
/// 提供可用 code 集合与每个 code 的原始 PROJ4 键值定义。
pub trait ProjSource {
    /// 目录已知的全部 code
    ///
    /// # Errors
    /// 目录不可读时返回错误
    fn available_codes(&self) -> CrsResult<Vec<CrsCode>>;

    /// 给定 code 的原始键值定义
    ///
    /// # Errors
    /// code 不在目录中时返回 `UnknownCode`
    fn raw_definition(&self, code: &CrsCode) -> CrsResult<Vec<(String, String)>>;

    /// 源/目标 CRS 之间的直接变换（委托，缺省无）
    ///
    /// # Errors
    /// 协作方查询失败时返回错误
    fn transformation_between(
        &self,
        _source: &Crs,
        _target: &Crs,
    ) -> CrsResult<Option<Transformation>> {
        Ok(None)
    }
}

// ============================================================================
// 仓库
// ============================================================================

struct StoreInner {
    cache: HashMap<CrsCode, Arc<Crs>>,
    resources: HashMap<CrsCode, CrsResource>,
    counters: IdCounters,
}

/// CRS 仓库
///
/// 缓存、资源表与合成 id 计数器由同一把互斥锁保护；
/// 解析路径整体持锁，见模块级说明。
pub struct CrsStore<S> {
    source: S,
    version: String,
    inner: Mutex<StoreInner>,
}

impl<S: ProjSource> CrsStore<S> {
    /// 以当前时钟为版本戳创建仓库
    #[must_use]
    pub fn new(source: S) -> Self {
        let now = Local::now();
        let version = format!(
            "{}-{}-{}T{}:{}",
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute()
        );
        Self::with_version(source, version)
    }

    /// 以指定版本戳创建仓库
    #[must_use]
    pub fn with_version(source: S, version: impl Into<String>) -> Self {
        Self {
            source,
            version: version.into(),
            inner: Mutex::new(StoreInner {
                cache: HashMap::new(),
                resources: HashMap::new(),
                counters: IdCounters::default(),
            }),
        }
    }

    /// 仓库版本戳
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// 目录已知的全部 code（透传）
    ///
    /// # Errors
    /// 目录不可读时返回错误
    pub fn available_codes(&self) -> CrsResult<Vec<CrsCode>> {
        self.source.available_codes()
    }

    /// 按 code 解析 CRS
    ///
    /// 任一别名命中缓存即返回已构造的实例；否则从目录取原始定义、
    /// 组装、按结果携带的全部别名写入缓存。
    ///
    /// # Errors
    /// 定义缺失或无效时返回针对该 code 的 `Configuration` 错误
    pub fn resolve(&self, code: &CrsCode) -> CrsResult<Arc<Crs>> {
        let mut guard = self.inner.lock();
        if let Some(hit) = guard.cache.get(code) {
            return Ok(Arc::clone(hit));
        }

        let raw = self
            .source
            .raw_definition(code)
            .map_err(|e| e.into_configuration(code))?;
        let mut params = ParamMap::new(raw);
        // 原始定义未携带 identifier 时，从被请求 code 的 EPSG 编号补全
        if params.identifier().is_none() {
            if let Some(number) = code.epsg_number() {
                params.insert("identifier", number.to_string());
            }
        }

        let inner = &mut *guard;
        let mut ctx = ResolveContext::new(&mut inner.counters, &self.version);
        let crs = parse_coordinate_system(&mut params, &mut ctx)
            .map_err(|e| e.into_configuration(code))?;
        let recorded = ctx.into_recorded();

        let unconsumed = params.unconsumed();
        if !unconsumed.is_empty() {
            debug!(code = %code, ?unconsumed, "定义包含未识别的参数");
        }

        let arc = Arc::new(crs);
        inner.cache.insert(code.clone(), Arc::clone(&arc));
        for alias in &arc.identity().codes {
            inner.cache.insert(alias.clone(), Arc::clone(&arc));
        }
        for (resource_code, resource) in recorded {
            inner.resources.insert(resource_code, resource);
        }
        for alias in &arc.identity().codes {
            inner
                .resources
                .insert(alias.clone(), CrsResource::Crs(Arc::clone(&arc)));
        }
        Ok(arc)
    }

    /// 枚举目录已知的全部 CRS
    ///
    /// 惰性逐个解析；解析失败的 code 记日志后跳过，单个坏定义
    /// 不中止整体枚举。目录之外已驻留缓存的 CRS 追加在末尾。
    /// 结果去重，顺序不保证。
    ///
    /// # Errors
    /// 目录的 code 枚举本身失败时返回错误
    pub fn list_all(&self) -> CrsResult<ListAll<'_, S>> {
        let codes = self.source.available_codes()?;
        Ok(ListAll {
            store: self,
            codes: codes.into_iter(),
            seen: HashSet::new(),
            leftovers: None,
        })
    }

    /// 按 code 查找已缓存的任意类型实体
    ///
    /// 只查缓存：从目录按任意 id 检索对象在本设计中有意不支持。
    ///
    /// # Errors
    /// code 未驻留缓存时返回 `UnsupportedOperation`
    pub fn resource_by_id(&self, code: &CrsCode) -> CrsResult<CrsResource> {
        let guard = self.inner.lock();
        if let Some(resource) = guard.resources.get(code) {
            return Ok(resource.clone());
        }
        if let Some(crs) = guard.cache.get(code) {
            return Ok(CrsResource::Crs(Arc::clone(crs)));
        }
        Err(CrsError::unsupported_operation(format!(
            "从目录按任意 id 检索对象不受支持，且 code 未驻留缓存: {code}"
        )))
    }

    /// 源/目标 CRS 之间的直接变换（委托外部目录）
    ///
    /// # Errors
    /// 协作方查询失败时返回错误
    pub fn direct_transformation(
        &self,
        source: &Crs,
        target: &Crs,
    ) -> CrsResult<Option<Transformation>> {
        self.source.transformation_between(source, target)
    }
}

/// [`CrsStore::list_all`] 的惰性枚举器
pub struct ListAll<'a, S> {
    store: &'a CrsStore<S>,
    codes: std::vec::IntoIter<CrsCode>,
    seen: HashSet<CrsCode>,
    leftovers: Option<std::vec::IntoIter<Arc<Crs>>>,
}

impl<S: ProjSource> Iterator for ListAll<'_, S> {
    type Item = Arc<Crs>;

    fn next(&mut self) -> Option<Self::Item> {
        for code in self.codes.by_ref() {
            if self.seen.contains(&code) {
                continue;
            }
            match self.store.resolve(&code) {
                Ok(crs) => {
                    self.seen.insert(code);
                    for alias in &crs.identity().codes {
                        self.seen.insert(alias.clone());
                    }
                    return Some(crs);
                }
                Err(err) if err.is_configuration() => {
                    info!(code = %code, error = %err, "跳过无法解析的 code");
                }
                Err(err) => {
                    warn!(code = %code, error = %err, "跳过 code（非配置错误）");
                }
            }
        }

        // 目录枚举完后补上仅驻留缓存的 CRS（导出专用/合成对象）
        let leftovers = self.leftovers.get_or_insert_with(|| {
            let guard = self.store.inner.lock();
            let mut extra = Vec::new();
            for (code, crs) in &guard.cache {
                if self.seen.contains(code) {
                    continue;
                }
                for alias in &crs.identity().codes {
                    self.seen.insert(alias.clone());
                }
                self.seen.insert(code.clone());
                extra.push(Arc::clone(crs));
            }
            extra.into_iter()
        });
        leftovers.next()
    }
}

// ============================================================================
// 测试
// ============================================================================
