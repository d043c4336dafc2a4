//! (尺度, 盒子数) 样本约简.

use std::collections::BTreeMap;

use super::ScaleCountPoint;

/// 约简 (尺度, 盒子数) 样本.
///
/// 1. 丢弃盒子数为 0 的样本;
/// 2. 对每个不同的盒子数, 只保留产生它的最小尺度.
///
/// 返回值按尺度升序排列. 由于每个盒子数只对应一个点,
/// 对返回值再次约简不会改变任何内容.
pub fn reduce_points<I: IntoIterator<Item = (usize, usize)>>(samples: I) -> Vec<ScaleCountPoint> {
    let mut smallest: BTreeMap<usize, usize> = BTreeMap::new();
    for (scale, count) in samples.into_iter().filter(|(_, count)| *count > 0) {
        smallest
            .entry(count)
            .and_modify(|s| *s = (*s).min(scale))
            .or_insert(scale);
    }

    let mut ans: Vec<ScaleCountPoint> = smallest
        .into_iter()
        .map(|(count, scale)| ScaleCountPoint { scale, count })
        .collect();
    ans.sort_unstable_by_key(|p| p.scale);
    ans
}

#[cfg(test)]
mod tests {
    use super::reduce_points;
    use crate::fractal::ScaleCountPoint;

    fn pairs(points: &[ScaleCountPoint]) -> Vec<(usize, usize)> {
        points.iter().map(|p| (p.scale, p.count)).collect()
    }

    #[test]
    fn test_keep_smallest_scale_per_count() {
        let samples = [(8, 1), (7, 1), (6, 1), (5, 8), (4, 8), (3, 27), (2, 64), (1, 512)];
        let points = reduce_points(samples);
        assert_eq!(
            pairs(&points),
            vec![(1, 512), (2, 64), (3, 27), (4, 8), (6, 1)]
        );
    }

    #[test]
    fn test_drop_zero_counts() {
        let points = reduce_points([(16, 0), (8, 0), (4, 3), (2, 9)]);
        assert_eq!(pairs(&points), vec![(2, 9), (4, 3)]);
        assert!(reduce_points([(4, 0), (2, 0)]).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let samples = [(9, 2), (8, 2), (7, 3), (5, 3), (4, 10), (3, 10), (2, 40), (1, 0)];
        let once = reduce_points(samples);
        let twice = reduce_points(once.iter().map(|p| (p.scale, p.count)));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_single_voxel_collapses() {
        let points = reduce_points((1..=8).rev().map(|s| (s, 1)));
        assert_eq!(pairs(&points), vec![(1, 1)]);
    }
}
