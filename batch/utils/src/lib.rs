//! 批处理程序依赖的通用组件.

use std::env;

pub mod loader;

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
pub fn sep_to<W: std::io::Write>(mut w: W) -> std::io::Result<()> {
    writeln!(&mut w, "{SEP}")
}

/// 将开关型字符串解析为布尔值.
///
/// `1`, `true`, `yes`, `on` (忽略大小写与首尾空白) 为真, 其余为假.
pub fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// 读取开关型环境变量 `key`. 未设置或不是合法 Unicode 时为假.
#[inline]
pub fn flag_from_env(key: &str) -> bool {
    env::var(key).is_ok_and(|v| parse_flag(&v))
}

#[cfg(test)]
mod tests {
    use super::{parse_flag, sep_to};

    #[test]
    fn test_parse_flag() {
        for s in ["1", "true", " TRUE ", "Yes", "on"] {
            assert!(parse_flag(s), "{s}");
        }
        for s in ["", "0", "false", "no", "off", "2"] {
            assert!(!parse_flag(s), "{s}");
        }
    }

    #[test]
    fn test_sep_to() {
        let mut buf = Vec::new();
        sep_to(&mut buf).unwrap();
        assert!(buf.ends_with(b"-\n"));
    }
}
