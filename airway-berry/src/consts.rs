//! 通用常量.

/// 标签体素值.
pub mod gray {
    /// 掩膜中背景的体素值.
    pub const BACKGROUND: u8 = 0;

    /// 体素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        matches!(p, BACKGROUND)
    }

    /// 体素是否是前景 (任意非零标签)?
    #[inline]
    pub const fn is_foreground(p: u8) -> bool {
        !is_background(p)
    }
}

/// 盒计数默认的最小盒子边长指数. 最小盒子边长为 `2^1 = 2`.
pub const DEFAULT_MIN_BOX_EXP: i32 = 1;

/// 盒计数默认的尺度采样个数.
pub const DEFAULT_SAMPLES: u32 = 20;

/// 盒计数默认的偏移相位个数. `0` 代表不做平移搜索.
pub const DEFAULT_OFFSETS: u32 = 0;

/// 计算迂曲度时, 端点欧氏距离的默认过滤阈值.
pub const DEFAULT_LENGTH_THRESHOLD: f64 = 1e-6;
