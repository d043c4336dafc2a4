//! 运行时错误.

use thiserror::Error;

/// 分形维数 / 迂曲度计算结果.
pub type CalcResult<T> = Result<T, CalcError>;

/// 分形维数或迂曲度计算的运行时错误.
///
/// 除 [`CalcError::ShapeMismatch`] 外的所有变体都属于 "退化输入"
/// (degenerate input): 输入本身合法, 但不足以得出有意义的数值.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// 体素网格最短轴小于最小盒子边长.
    ///
    /// 第一个参数是最短轴长度, 第二个参数是最小盒子边长 `2^min_box_size`.
    #[error("volume too small: shortest axis {0} < minimum box size {1}")]
    VolumeTooSmall(usize, usize),

    /// 盒子边长指数过大, `2^指数` 超出 `usize` 的表示范围.
    #[error("box size exponent {0} overflows usize")]
    ExponentTooLarge(i32),

    /// 去重后的盒子尺度不足两个.
    #[error("only {0} distinct box scale(s) survive, at least 2 required")]
    TooFewScales(usize),

    /// 体素网格中没有任何前景体素.
    #[error("volume has no occupied voxel")]
    EmptyVolume,

    /// 约简后的 (尺度, 盒子数) 点不足以做直线拟合.
    ///
    /// 第一个参数代表目前已有的点, 第二个参数代表实际拟合需要的最少点数.
    #[error("{0} point(s) left after reduction, fitting requires {1}")]
    TooFewPoints(usize, usize),

    /// 长度过滤后没有剩余分支.
    #[error("no branch survives the euclidean length filter")]
    NoBranches,

    /// 剩余分支的路径长度总和为零.
    #[error("retained branches have zero total path length")]
    ZeroTotalLength,

    /// 输入数据形状不符合要求 (轴数不为 3, 分支表缺少字段, 骨架与掩膜形状不一致等).
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl CalcError {
    /// 是否为退化输入错误.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.is_shape_mismatch()
    }

    /// 是否为形状不匹配错误.
    #[inline]
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch(_))
    }
}

/// 数据加载错误. 包括底层 I/O, nifti 解析, 以及分支表解析错误.
#[derive(Debug, Error)]
pub enum LoadError {
    /// 底层 I/O 错误.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// 打开或解析 nifti 文件错误.
    #[error("nifti error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    /// 分支表或体素网格形状错误.
    #[error(transparent)]
    Calc(#[from] CalcError),

    /// 分支表 JSON 解析错误.
    #[cfg(feature = "serde")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
