//! 骨架分支迂曲度.
//!
//! 迂曲度是分支沿骨架的路径长度与两端点直线距离之比. 直线段为 1.0, 弯曲分支大于 1.0.
//! 端点几乎重合的分支 (骨架化常见的退化产物) 会先被过滤掉.

use itertools::Itertools;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

mod skeleton;
#[cfg(feature = "serde")]
mod table;

pub use skeleton::{region_tortuosity, skeleton_tortuosity, Skeletonize, SummarizeSkeleton};
#[cfg(feature = "serde")]
pub use table::BranchTable;

/// 骨架上的一条分支. 坐标与长度均为物理单位 (通常为毫米).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BranchRecord {
    /// 起点坐标.
    pub src: [f64; 3],

    /// 终点坐标.
    pub dst: [f64; 3],

    /// 沿骨架的测地长度.
    pub path_length: f64,
}

impl BranchRecord {
    /// 由两端点和路径长度创建分支.
    #[inline]
    pub fn new(src: [f64; 3], dst: [f64; 3], path_length: f64) -> Self {
        Self {
            src,
            dst,
            path_length,
        }
    }

    /// 两端点的欧氏距离.
    #[inline]
    pub fn euclidean_length(&self) -> f64 {
        self.src
            .iter()
            .zip(self.dst.iter())
            .map(|(a, b)| (b - a).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// 单条分支的迂曲度.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TortuosityRecord {
    /// 两端点的欧氏距离.
    pub euclidean_length: f64,

    /// 沿骨架的测地长度.
    pub path_length: f64,

    /// `path_length / euclidean_length`.
    pub tortuosity: f64,
}

/// 整棵 (或某区域的) 骨架的迂曲度汇总.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tortuosity {
    /// 所有保留分支迂曲度的算术平均.
    #[cfg_attr(feature = "serde", serde(rename = "mean_tortuosity"))]
    pub mean: f64,

    /// 以路径长度加权的平均迂曲度.
    #[cfg_attr(feature = "serde", serde(rename = "weighted_tortuosity"))]
    pub weighted: f64,
}

/// 计算端点距离大于 `length_threshold` 的每条分支的迂曲度. 顺序与输入一致.
///
/// 迂曲度不做截断: 路径长度小于端点距离 (上游骨架化缺陷) 时照实返回小于 1 的值.
pub fn tortuosity_records(
    branches: &[BranchRecord],
    length_threshold: f64,
) -> Vec<TortuosityRecord> {
    branches
        .iter()
        .map(|b| (b, b.euclidean_length()))
        .filter(|(_, euclid)| *euclid > length_threshold)
        .map(|(b, euclid)| TortuosityRecord {
            euclidean_length: euclid,
            path_length: b.path_length,
            tortuosity: b.path_length / euclid,
        })
        .collect()
}

/// 计算分支表的平均迂曲度和长度加权迂曲度.
///
/// 加权迂曲度为 `Σ(path_length · tortuosity) / Σ(path_length)`.
///
/// # 返回值
///
/// - 过滤后没有分支时, 返回 `Err(CalcError::NoBranches)`;
/// - 保留分支的路径长度总和为 0 时, 返回 `Err(CalcError::ZeroTotalLength)`;
/// - 其他情况下返回 `Ok(Tortuosity)`.
pub fn tortuosity(branches: &[BranchRecord], length_threshold: f64) -> CalcResult<Tortuosity> {
    let records = tortuosity_records(branches, length_threshold);
    if records.is_empty() {
        return Err(CalcError::NoBranches);
    }
    log::debug!(
        "{} of {} branch(es) kept by euclidean length > {length_threshold:e}",
        records.len(),
        branches.len()
    );

    let (tort_sum, weighted_sum, length_sum) = records.iter().fold(
        (0.0, 0.0, 0.0),
        |(t, wt, l), r| (t + r.tortuosity, wt + r.path_length * r.tortuosity, l + r.path_length),
    );
    if length_sum == 0.0 {
        return Err(CalcError::ZeroTotalLength);
    }

    Ok(Tortuosity {
        mean: tort_sum / records.len() as f64,
        weighted: weighted_sum / length_sum,
    })
}

/// 迂曲度的分布范围 `(min, max)`. 没有分支时返回 `None`.
pub fn tortuosity_range(records: &[TortuosityRecord]) -> Option<(f64, f64)> {
    records
        .iter()
        .map(|r| r.tortuosity)
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
}

#[cfg(test)]
mod tests {
    use super::{tortuosity, tortuosity_range, tortuosity_records, BranchRecord};
    use crate::consts::DEFAULT_LENGTH_THRESHOLD;
    use crate::error::CalcError;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_two_branches() {
        let branches = [
            BranchRecord::new([0.0, 0.0, 0.0], [0.0, 0.0, 10.0], 10.0),
            BranchRecord::new([0.0, 0.0, 0.0], [0.0, 0.0, 5.0], 10.0),
        ];
        let records = tortuosity_records(&branches, DEFAULT_LENGTH_THRESHOLD);
        assert_eq!(records[0].tortuosity, 1.0);
        assert_eq!(records[1].tortuosity, 2.0);

        let t = tortuosity(&branches, DEFAULT_LENGTH_THRESHOLD).unwrap();
        assert!(f64_eq(t.mean, 1.5));
        assert!(f64_eq(t.weighted, 1.5));
        assert_eq!(tortuosity_range(&records), Some((1.0, 2.0)));
    }

    #[test]
    fn test_straight_and_curved() {
        let straight = BranchRecord::new([1.0, 2.0, 3.0], [4.0, 6.0, 3.0], 5.0);
        assert_eq!(straight.euclidean_length(), 5.0);
        let t = tortuosity(&[straight], DEFAULT_LENGTH_THRESHOLD).unwrap();
        assert_eq!(t.mean, 1.0);
        assert_eq!(t.weighted, 1.0);

        let curved = BranchRecord::new([1.0, 2.0, 3.0], [4.0, 6.0, 3.0], 5.5);
        let t = tortuosity(&[curved], DEFAULT_LENGTH_THRESHOLD).unwrap();
        assert!(t.mean > 1.0);
    }

    #[test]
    fn test_equal_lengths_weighted_equals_mean() {
        let branches: Vec<BranchRecord> = (1..=6)
            .map(|i| BranchRecord::new([0.0; 3], [i as f64, 1.0, 0.5], 12.0))
            .collect();
        let t = tortuosity(&branches, DEFAULT_LENGTH_THRESHOLD).unwrap();
        assert!((t.mean - t.weighted).abs() < 1e-12);
    }

    #[test]
    fn test_weighting_favors_long_branches() {
        let branches = [
            BranchRecord::new([0.0; 3], [0.0, 0.0, 30.0], 30.0),
            BranchRecord::new([0.0; 3], [0.0, 0.0, 1.0], 3.0),
        ];
        let t = tortuosity(&branches, DEFAULT_LENGTH_THRESHOLD).unwrap();
        assert!(f64_eq(t.mean, 2.0));
        // (30 * 1 + 3 * 3) / 33
        assert!(f64_eq(t.weighted, 39.0 / 33.0));
        assert!(t.weighted < t.mean);
    }

    #[test]
    fn test_short_branches_filtered() {
        let branches = [
            BranchRecord::new([1.0; 3], [1.0; 3], 4.0),
            BranchRecord::new([0.0; 3], [0.0, 3.0, 4.0], 10.0),
        ];
        let records = tortuosity_records(&branches, DEFAULT_LENGTH_THRESHOLD);
        assert_eq!(records.len(), 1);
        let t = tortuosity(&branches, DEFAULT_LENGTH_THRESHOLD).unwrap();
        assert!(f64_eq(t.mean, 2.0));

        // 阈值足够大时全部过滤.
        assert_eq!(tortuosity(&branches, 5.0).unwrap_err(), CalcError::NoBranches);
    }

    #[test]
    fn test_not_clamped_below_one() {
        let b = BranchRecord::new([0.0; 3], [0.0, 0.0, 4.0], 2.0);
        let t = tortuosity(&[b], DEFAULT_LENGTH_THRESHOLD).unwrap();
        assert_eq!(t.mean, 0.5);
    }

    #[test]
    fn test_degenerate_tables() {
        let e = tortuosity(&[], DEFAULT_LENGTH_THRESHOLD).unwrap_err();
        assert_eq!(e, CalcError::NoBranches);
        assert!(e.is_degenerate());

        let zero = [
            BranchRecord::new([0.0; 3], [1.0, 0.0, 0.0], 0.0),
            BranchRecord::new([0.0; 3], [0.0, 2.0, 0.0], 0.0),
        ];
        assert_eq!(
            tortuosity(&zero, DEFAULT_LENGTH_THRESHOLD).unwrap_err(),
            CalcError::ZeroTotalLength
        );
        assert_eq!(tortuosity_range(&[]), None);
    }
}
