#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 提供三维气道分割掩膜的形态学度量: 盒计数分形维数与骨架分支迂曲度.
//!
//! 该 crate 只提供 `safe` 接口, 所有计算都是无状态的纯函数.
//!
//! # 注意
//!
//! 1. 分形维数在体素索引空间计算, 不使用体素分辨率.
//!   迂曲度在物理空间 (通常为毫米) 计算, 坐标由外部骨架汇总工具给出.
//! 2. 骨架化与骨架汇总算法不在本 crate 中实现, 见 [`tortuosity::Skeletonize`]
//!   和 [`tortuosity::SummarizeSkeleton`].
//! 3. 计算错误以 [`CalcError`] 返回, 不会 panic, 也不会在内部记录后吞掉.
//!
//! # 功能
//!
//! ### 盒计数分形维数 ✅
//!
//! 尺度生成、偏移相位搜索、(尺度, 盒子数) 约简与对数坐标直线拟合.
//! 可选的 `rayon` feature 会在尺度之间并行计数.
//!
//! 实现位于 `airway-berry/src/fractal`.
//!
//! ### 最小二乘多项式拟合的纯 Rust 实现 ✅
//!
//! 正规方程 + 部分主元高斯消元, 不依赖 BLAS/LAPACK.
//!
//! 实现位于 `airway-berry/src/fitting`.
//!
//! ### 分支迂曲度 ✅
//!
//! 逐分支迂曲度、算术平均与长度加权平均. `serde` feature 下提供分支表
//! JSON 适配 (兼容连字符与下划线两种列名).
//!
//! 实现位于 `airway-berry/src/tortuosity`.
//!
//! ### 数据集 ✅
//!
//! NIfTI 掩膜读取、按标签取区域, 以及迭代器风格的病例加载器.
//!
//! 实现位于 `airway-berry/src/data` 和 `airway-berry/src/dataset`.

/// 三维索引, 按 `(z, h, w)` 排列.
pub type Idx3d = (usize, usize, usize);

/// 3D nii 掩膜与体素网格基础数据结构.
mod data;

pub use data::{AirwayMask, NiftiHeaderAttr, VoxelVolume};

pub mod consts;

pub mod dataset;

mod error;

pub use error::{CalcError, CalcResult, LoadError};

pub mod fitting;

pub mod fractal;

pub mod prelude;

pub mod tortuosity;
