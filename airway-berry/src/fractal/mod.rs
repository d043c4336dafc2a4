//! 盒计数分形维数.
//!
//! 用一系列边长递减的立方体盒子覆盖三维二值结构, 统计每个尺度下被接触的盒子数
//! `N(s)`, 再在 `(ln(1/s), ln N(s))` 上做最小二乘直线拟合, 斜率即分形维数.
//!
//! 流程分四步, 每一步都是无状态的纯函数:
//!
//! 1. [`box_scales`]: 生成降序去重的盒子边长;
//! 2. [`box_counts`]: 对每个边长 (及可选的偏移相位) 计数, 取各相位的最小值;
//! 3. [`reduce_points`]: 丢弃零计数, 每个计数只保留最小的边长;
//! 4. 直线拟合, 见 [`crate::fitting::line_f64`].

use ndarray::Array1;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MIN_BOX_EXP, DEFAULT_OFFSETS, DEFAULT_SAMPLES};
use crate::data::VoxelVolume;
use crate::error::{CalcError, CalcResult};
use crate::fitting;

mod boxes;
mod reduce;
mod scales;

pub use boxes::{box_counts, count_boxes, min_box_count, offsets};
pub use reduce::reduce_points;
pub use scales::box_scales;

/// 盒计数参数.
///
/// `max_box_size` 与 `min_box_size` 都是以 2 为底的 **指数**:
/// 实际盒子边长在 `2^max_box_size` 与 `2^min_box_size` 之间.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxCountSpec {
    /// 最大边长指数. 为 `None` 时取 `floor(log2(最短轴))`.
    max_box_size: Option<i32>,

    /// 最小边长指数.
    min_box_size: i32,

    /// 指数采样个数 (去重前).
    n_samples: u32,

    /// 每个尺度下搜索的偏移相位个数. `0` 代表只使用偏移 0.
    n_offsets: u32,
}

impl Default for BoxCountSpec {
    fn default() -> Self {
        Self {
            max_box_size: None,
            min_box_size: DEFAULT_MIN_BOX_EXP,
            n_samples: DEFAULT_SAMPLES,
            n_offsets: DEFAULT_OFFSETS,
        }
    }
}

impl BoxCountSpec {
    /// 直接指定全部参数.
    pub fn new(max_box_size: Option<i32>, min_box_size: i32, n_samples: u32, n_offsets: u32) -> Self {
        Self {
            max_box_size,
            min_box_size,
            n_samples,
            n_offsets,
        }
    }

    /// 替换最大边长指数.
    #[inline]
    pub fn with_max_box_size(mut self, max_box_size: Option<i32>) -> Self {
        self.max_box_size = max_box_size;
        self
    }

    /// 替换最小边长指数.
    #[inline]
    pub fn with_min_box_size(mut self, min_box_size: i32) -> Self {
        self.min_box_size = min_box_size;
        self
    }

    /// 替换指数采样个数.
    #[inline]
    pub fn with_n_samples(mut self, n_samples: u32) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// 替换偏移相位个数.
    #[inline]
    pub fn with_n_offsets(mut self, n_offsets: u32) -> Self {
        self.n_offsets = n_offsets;
        self
    }

    /// 最大边长指数.
    #[inline]
    pub fn max_box_size(&self) -> Option<i32> {
        self.max_box_size
    }

    /// 最小边长指数.
    #[inline]
    pub fn min_box_size(&self) -> i32 {
        self.min_box_size
    }

    /// 指数采样个数.
    #[inline]
    pub fn n_samples(&self) -> u32 {
        self.n_samples
    }

    /// 偏移相位个数.
    #[inline]
    pub fn n_offsets(&self) -> u32 {
        self.n_offsets
    }
}

/// 约简后的拟合输入点. `count` 恒为正.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleCountPoint {
    /// 盒子边长 (体素).
    pub scale: usize,

    /// 被接触的盒子数.
    pub count: usize,
}

/// 对数坐标下的拟合结果, 用于画图或排查异常病例.
///
/// 只做观察用途: 其中的斜率与 [`fractal_dimension`] 的返回值完全相同.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FitDiagnostics {
    points: Vec<ScaleCountPoint>,
    log_inv_scale: Vec<f64>,
    log_count: Vec<f64>,
    slope: f64,
    intercept: f64,
}

impl FitDiagnostics {
    /// 分形维数, 即拟合直线的斜率.
    #[inline]
    pub fn dimension(&self) -> f64 {
        self.slope
    }

    /// 拟合直线的截距.
    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// 约简后的 (尺度, 盒子数) 点, 按尺度升序.
    #[inline]
    pub fn points(&self) -> &[ScaleCountPoint] {
        &self.points
    }

    /// 横坐标 `ln(1/scale)`.
    #[inline]
    pub fn log_inv_scale(&self) -> &[f64] {
        &self.log_inv_scale
    }

    /// 纵坐标 `ln(count)`.
    #[inline]
    pub fn log_count(&self) -> &[f64] {
        &self.log_count
    }

    /// 拟合直线在 `x = ln(1/scale)` 处的值.
    #[inline]
    pub fn fitted(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// 计算 `volume` 的盒计数分形维数.
///
/// # 返回值
///
/// - 网格过小或尺度不足: `Err(CalcError::{VolumeTooSmall, TooFewScales})`;
/// - 网格中没有前景体素: `Err(CalcError::EmptyVolume)`;
/// - 约简后不足两个点: `Err(CalcError::TooFewPoints)`;
/// - 其他情况返回斜率.
#[inline]
pub fn fractal_dimension(volume: &VoxelVolume, spec: &BoxCountSpec) -> CalcResult<f64> {
    fractal_dimension_with_diagnostics(volume, spec).map(|d| d.dimension())
}

/// 与 [`fractal_dimension`] 相同, 但同时返回对数坐标下的拟合细节.
pub fn fractal_dimension_with_diagnostics(
    volume: &VoxelVolume,
    spec: &BoxCountSpec,
) -> CalcResult<FitDiagnostics> {
    let shape = volume.shape();
    let scales = box_scales(shape, spec)?;

    let voxels = volume.occupied();
    if voxels.is_empty() {
        return Err(CalcError::EmptyVolume);
    }

    let counts = box_counts(&voxels, shape, &scales, spec.n_offsets());
    log::trace!("box counts: {:?}", scales.iter().zip(counts.iter()).collect::<Vec<_>>());

    let points = reduce_points(scales.iter().copied().zip(counts));
    if points.len() < 2 {
        return Err(CalcError::TooFewPoints(points.len(), 2));
    }

    let x: Array1<f64> = points.iter().map(|p| (1.0 / p.scale as f64).ln()).collect();
    let y: Array1<f64> = points.iter().map(|p| (p.count as f64).ln()).collect();
    let (slope, intercept) = fitting::line_f64(x.view(), y.view())?;
    log::debug!(
        "fractal fit over {} point(s) of {} scale(s): slope = {slope:.4}",
        points.len(),
        scales.len()
    );

    Ok(FitDiagnostics {
        points,
        log_inv_scale: x.to_vec(),
        log_count: y.to_vec(),
        slope,
        intercept,
    })
}

/// 分形维数实现块
impl VoxelVolume {
    /// 以 `spec` 为参数计算盒计数分形维数. 见 [`fractal_dimension`].
    #[inline]
    pub fn fractal_dimension(&self, spec: &BoxCountSpec) -> CalcResult<f64> {
        fractal_dimension(self, spec)
    }
}
