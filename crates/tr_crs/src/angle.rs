// crates/tr_crs/src/angle.rs

//! 六十进制角度解析
//!
//! 解析 PROJ4 定义中的角度文本：裸十进制数（度），或
//! `D<度标记>[M<分标记>[S<秒标记>]]<方向字母>` 形式的 DMS 表达。
//!
//! # 规则
//!
//! - 度标记 `d` 或 `°`，分标记 `m` 或 `'`，秒标记 `s` 或 `"`
//! - 末尾方向字母 S/W 取负，N/E 保持原值，大小写不敏感
//! - 无方向字母时，负的度分量已携带符号，分/秒按量值随度的符号累加
//! - 分必须在 [0,59]，秒必须在 [0,60)
//!
//! # 示例
//!
//! ```
//! use tr_crs::angle::{parse_angle, AngleUnit};
//!
//! let rad = parse_angle("23d42'58.815\"E", AngleUnit::Radians).unwrap();
//! assert!((rad - 0.413928).abs() < 1e-6);
//! ```

use crate::error::{CrsError, CrsResult};
use tr_foundation::ensure;

/// 输出角度单位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    /// 弧度
    Radians,
    /// 十进制度
    Degrees,
}

/// 解析角度文本
///
/// # Errors
/// 文本无法解析为数字，或分/秒超出允许范围时返回格式错误
pub fn parse_angle(text: &str, unit: AngleUnit) -> CrsResult<f64> {
    let original = text;
    let mut text = text.trim();
    if text.is_empty() {
        return Err(CrsError::format(original, "空的角度文本"));
    }

    // 末尾方向字母
    let mut negate = false;
    if let Some(last) = text.chars().last() {
        match last.to_ascii_uppercase() {
            'W' | 'S' => {
                negate = true;
                text = &text[..text.len() - last.len_utf8()];
            }
            'E' | 'N' => {
                text = &text[..text.len() - last.len_utf8()];
            }
            _ => {}
        }
    }

    let degrees = match find_mark(text, &['d', '\u{00b0}']) {
        Some(split) => {
            let (dd, mmss) = split;
            let d = parse_number(dd, original)?;
            let (m, s) = parse_minutes_seconds(mmss, original)?;
            dms_combine(d, m, s)
        }
        // 无度标记：裸十进制数（度）
        None => parse_number(text, original)?,
    };

    let mut result = match unit {
        AngleUnit::Degrees => degrees,
        AngleUnit::Radians => degrees.to_radians(),
    };
    if negate {
        result = -result;
    }
    Ok(result)
}

/// 在文本中查找任一标记字符，返回标记前后两段
fn find_mark<'a>(text: &'a str, marks: &[char]) -> Option<(&'a str, &'a str)> {
    for (i, c) in text.char_indices() {
        if marks.contains(&c) {
            return Some((&text[..i], &text[i + c.len_utf8()..]));
        }
    }
    None
}

/// 解析度标记之后的分/秒部分
fn parse_minutes_seconds(mmss: &str, original: &str) -> CrsResult<(f64, f64)> {
    if mmss.is_empty() {
        return Ok((0.0, 0.0));
    }

    let (minutes, seconds) = match find_mark(mmss, &['m', '\'']) {
        Some((mm, rest)) => {
            let m = if mm.is_empty() {
                0.0
            } else {
                parse_number(mm, original)?
            };
            // 去掉秒标记后剩余即为秒数
            let rest = rest
                .strip_suffix('s')
                .or_else(|| rest.strip_suffix('"'))
                .unwrap_or(rest);
            let s = if rest.is_empty() {
                0.0
            } else {
                parse_number(rest, original)?
            };
            (m, s)
        }
        // 无分标记：整个剩余部分是分
        None => (parse_number(mmss, original)?, 0.0),
    };

    ensure!(
        (0.0..=59.0).contains(&minutes),
        CrsError::format(original, "分必须在 0 到 59 之间")
    );
    ensure!(
        (0.0..60.0).contains(&seconds),
        CrsError::format(original, "秒必须在 0 到 60 之间（不含 60）")
    );
    Ok((minutes, seconds))
}

fn parse_number(text: &str, original: &str) -> CrsResult<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| CrsError::format(original, format!("不是有效的数字分量 {text:?}: {e}")))
}

/// 度分秒合并为十进制度
///
/// 负角度时度分量为负，分/秒作为量值沿度的符号方向累加。
fn dms_combine(d: f64, m: f64, s: f64) -> f64 {
    if d >= 0.0 {
        d + m / 60.0 + s / 3600.0
    } else {
        d - m / 60.0 - s / 3600.0
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_athens_reference_value() {
        // EPSG:8912 雅典子午线: 23.7163375°
        let rad = parse_angle("23d42'58.815\"E", AngleUnit::Radians).expect("解析");
        assert!((rad - 23.716_337_5_f64.to_radians()).abs() < 1e-12);
        assert!((rad - 0.413_928).abs() < 1e-6);
    }

    #[test]
    fn test_direction_negation() {
        let east = parse_angle("74d04'51.3\"E", AngleUnit::Degrees).expect("E");
        let west = parse_angle("74d04'51.3\"W", AngleUnit::Degrees).expect("W");
        assert!((east + west).abs() < 1e-12);
        assert!(west < 0.0);

        let north = parse_angle("10d30'N", AngleUnit::Degrees).expect("N");
        let south = parse_angle("10d30'S", AngleUnit::Degrees).expect("S");
        assert!((north - 10.5).abs() < 1e-12);
        assert!((south + 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_lowercase_direction() {
        let west = parse_angle("17d40'w", AngleUnit::Degrees).expect("小写方向");
        assert!((west + (17.0 + 40.0 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_negative_degrees_without_direction() {
        // 无方向字母：分/秒沿度的符号方向累加
        let value = parse_angle("-3d30'", AngleUnit::Degrees).expect("负角度");
        assert!((value + 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_bare_decimal_degrees_to_radians() {
        let rad = parse_angle("90", AngleUnit::Radians).expect("裸数字");
        assert!((rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let deg = parse_angle("-123.25", AngleUnit::Degrees).expect("裸数字");
        assert!((deg + 123.25).abs() < 1e-12);
    }

    #[test]
    fn test_degree_sign_mark() {
        let a = parse_angle("12°27'8.4\"E", AngleUnit::Degrees).expect("° 标记");
        let b = parse_angle("12d27'8.4\"E", AngleUnit::Degrees).expect("d 标记");
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_minutes_only_without_mark() {
        // 度标记后无分标记：剩余整体视为分
        let value = parse_angle("17d40", AngleUnit::Degrees).expect("仅分");
        assert!((value - (17.0 + 40.0 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_minutes_out_of_range() {
        assert!(parse_angle("10d61'0\"", AngleUnit::Degrees).is_err());
    }

    #[test]
    fn test_seconds_out_of_range() {
        assert!(parse_angle("10d0'60\"", AngleUnit::Degrees).is_err());
        assert!(parse_angle("10d0'59.999\"", AngleUnit::Degrees).is_ok());
    }

    #[test]
    fn test_garbage_input() {
        assert!(parse_angle("", AngleUnit::Degrees).is_err());
        assert!(parse_angle("abc", AngleUnit::Degrees).is_err());
        assert!(parse_angle("12dxy'", AngleUnit::Degrees).is_err());
    }
}
