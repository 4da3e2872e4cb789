// crates/tr_crs/src/params.rs

//! 参数表 (Parameter Map)
//!
//! 单个 CRS 定义范围内的 PROJ4 键值查找。每个解析步骤"消费"它读取的键；
//! 原始定义保持完整，消费状态单独记录，组装结束后剩余的未消费键
//! 即为该定义中未被识别的参数（仅作诊断，不致错）。

use crate::error::{CrsError, CrsResult};
use std::collections::{BTreeMap, BTreeSet};

/// 单个 CRS 定义的参数表
///
/// 与直接从映射中删除键不同，这里保留原始键值并跟踪消费集合，
/// 使完整定义始终可用于诊断输出。
#[derive(Debug, Clone, Default)]
pub struct ParamMap {
    values: BTreeMap<String, String>,
    consumed: BTreeSet<String>,
}

impl ParamMap {
    /// 从键值对创建
    pub fn new(values: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            values: values.into_iter().collect(),
            consumed: BTreeSet::new(),
        }
    }

    /// 消费并返回键对应的原始值
    ///
    /// 键不存在或已被消费时返回 `None`。
    pub fn take(&mut self, key: &str) -> Option<String> {
        if self.consumed.contains(key) {
            return None;
        }
        let value = self.values.get(key)?;
        self.consumed.insert(key.to_string());
        Some(value.clone())
    }

    /// 消费并返回去除首尾空白后的非空值
    ///
    /// 值为空白时仍计为已消费，但返回 `None`（与缺失同义）。
    pub fn take_nonblank(&mut self, key: &str) -> Option<String> {
        let value = self.take(key)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 消费并解析为浮点数
    ///
    /// # Errors
    /// 值存在但无法解析为数字时返回格式错误
    pub fn take_f64(&mut self, key: &str) -> CrsResult<Option<f64>> {
        match self.take_nonblank(key) {
            None => Ok(None),
            Some(text) => text
                .parse::<f64>()
                .map(Some)
                .map_err(|e| CrsError::format(text, format!("不是有效的数字: {e}"))),
        }
    }

    /// 只读访问（不消费），用于诊断信息
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// 该定义的 `identifier` 参数（只读，不消费）
    #[must_use]
    pub fn identifier(&self) -> Option<String> {
        self.peek("identifier")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// 写入键值（用于补全缺失的 identifier）
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// 键是否存在（无论是否已消费）
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// 组装结束后仍未被消费的键值对
    #[must_use]
    pub fn unconsumed(&self) -> Vec<(&str, &str)> {
        self.values
            .iter()
            .filter(|(k, _)| !self.consumed.contains(*k))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl FromIterator<(String, String)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParamMap {
        ParamMap::new([
            ("proj".to_string(), "tmerc".to_string()),
            ("a".to_string(), "6378137".to_string()),
            ("blank".to_string(), "   ".to_string()),
            ("weird".to_string(), "xyz".to_string()),
        ])
    }

    #[test]
    fn test_take_consumes_once() {
        let mut params = sample();
        assert_eq!(params.take("proj").as_deref(), Some("tmerc"));
        assert_eq!(params.take("proj"), None);
    }

    #[test]
    fn test_take_nonblank_treats_blank_as_missing() {
        let mut params = sample();
        assert_eq!(params.take_nonblank("blank"), None);
        // 空白值同样计为已消费
        assert_eq!(params.take("blank"), None);
    }

    #[test]
    fn test_take_f64() {
        let mut params = sample();
        assert_eq!(params.take_f64("a").expect("数字"), Some(6_378_137.0));
        assert_eq!(params.take_f64("missing").expect("缺失"), None);
        assert!(params.take_f64("weird").is_err());
    }

    #[test]
    fn test_unconsumed_diagnostics() {
        let mut params = sample();
        params.take("proj");
        params.take("a");
        let rest = params.unconsumed();
        assert_eq!(rest.len(), 2);
        assert!(rest.iter().any(|(k, _)| *k == "weird"));
        // peek 不影响消费状态
        assert_eq!(params.peek("weird"), Some("xyz"));
        assert_eq!(params.unconsumed().len(), 2);
    }

    #[test]
    fn test_identifier_helper() {
        let mut params = ParamMap::new([("identifier".to_string(), " 4326 ".to_string())]);
        assert_eq!(params.identifier().as_deref(), Some("4326"));
        // identifier 读取不消费
        assert_eq!(params.take("identifier").as_deref(), Some(" 4326 "));
    }
}
