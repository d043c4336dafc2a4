//! 骨架化与骨架汇总的外部能力接口.
//!
//! 本 crate 不实现骨架化或骨架图分析算法, 仅约定二者的输入输出形态,
//! 并提供把它们与迂曲度计算串接起来的流程.

use ndarray::{Array3, ArrayView3};

use super::{tortuosity, BranchRecord, Tortuosity};
use crate::data::{AirwayMask, NiftiHeaderAttr, VoxelVolume};
use crate::error::{CalcError, CalcResult};

/// 将三维二值结构细化为单体素宽的拓扑骨架.
///
/// 返回值必须与输入形状相同.
pub trait Skeletonize {
    /// 细化 `mask`.
    fn skeletonize(&self, mask: ArrayView3<bool>) -> Array3<bool>;
}

/// 将骨架汇总为分支表.
///
/// `spacing` 与骨架的轴顺序一致, 返回的坐标和长度以 `spacing` 的单位计.
pub trait SummarizeSkeleton {
    /// 汇总 `skeleton`.
    fn summarize(
        &self,
        skeleton: ArrayView3<bool>,
        spacing: [f64; 3],
    ) -> CalcResult<Vec<BranchRecord>>;
}

/// 对 `volume` 依次骨架化、汇总并计算迂曲度.
///
/// 如果骨架与 `volume` 形状不一致, 返回 `Err(CalcError::ShapeMismatch)`.
/// 其余错误见 [`tortuosity`].
pub fn skeleton_tortuosity<S, G>(
    volume: &VoxelVolume,
    spacing: [f64; 3],
    skeletonizer: &S,
    summarizer: &G,
    length_threshold: f64,
) -> CalcResult<Tortuosity>
where
    S: Skeletonize + ?Sized,
    G: SummarizeSkeleton + ?Sized,
{
    let skeleton = skeletonizer.skeletonize(volume.data());
    if skeleton.dim() != volume.shape() {
        return Err(CalcError::ShapeMismatch(format!(
            "skeleton shape {:?} differs from mask shape {:?}",
            skeleton.dim(),
            volume.shape()
        )));
    }
    let branches = summarizer.summarize(skeleton.view(), spacing)?;
    log::debug!("skeleton summarized into {} branch(es)", branches.len());
    tortuosity(&branches, length_threshold)
}

/// 对 `mask` 中的每个非零标签区域分别骨架化并计算迂曲度.
///
/// 体素分辨率取自 `mask` 的 header. 结果按标签升序排列, 每个区域的错误独立返回.
pub fn region_tortuosity<S, G>(
    mask: &AirwayMask,
    skeletonizer: &S,
    summarizer: &G,
    length_threshold: f64,
) -> Vec<(u8, CalcResult<Tortuosity>)>
where
    S: Skeletonize + ?Sized,
    G: SummarizeSkeleton + ?Sized,
{
    let spacing = mask.pix_dim();
    mask.labels()
        .into_iter()
        .map(|k| {
            let t = skeleton_tortuosity(
                &mask.region(k),
                spacing,
                skeletonizer,
                summarizer,
                length_threshold,
            );
            (k, t)
        })
        .collect()
}
