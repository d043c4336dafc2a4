//! 盒计数.

use super::scales::linspace;
use crate::Idx3d;

/// 尺度 `scale` 下需要搜索的偏移相位.
///
/// `n_offsets == 0` 时只有偏移 0, 否则在 `[0, scale]` 闭区间上等距取 `n_offsets` 个.
pub fn offsets(scale: usize, n_offsets: u32) -> Vec<f64> {
    if n_offsets == 0 {
        vec![0.0]
    } else {
        linspace(0.0, scale as f64, n_offsets as usize)
    }
}

/// 体素坐标 `c` 在起点为 `-offset`, 宽为 `scale` 的一维分箱中的箱号.
#[inline]
fn bin_of(c: usize, scale: f64, offset: f64) -> usize {
    ((c as f64 + offset) / scale).floor() as usize
}

/// 计算以 `scale` 为边长, 网格原点平移 `-offset` 后, `voxels` 接触到的盒子个数.
///
/// 每个轴上的分箱边界为 `-offset, -offset + scale, ...`, 直到覆盖该轴的全部体素.
/// 因此不会有体素落在分箱之外.
pub fn count_boxes(voxels: &[Idx3d], shape: Idx3d, scale: usize, offset: f64) -> usize {
    debug_assert!(scale >= 1);
    let s = scale as f64;
    let bins = |extent: usize| {
        if extent == 0 {
            0
        } else {
            bin_of(extent - 1, s, offset) + 1
        }
    };
    let (_, nh, nw) = (bins(shape.0), bins(shape.1), bins(shape.2));

    let mut touched: Vec<usize> = voxels
        .iter()
        .map(|&(z, h, w)| {
            let (bz, bh, bw) = (bin_of(z, s, offset), bin_of(h, s, offset), bin_of(w, s, offset));
            (bz * nh + bh) * nw + bw
        })
        .collect();
    touched.sort_unstable();
    touched.dedup();
    touched.len()
}

/// 在所有偏移相位中取最小的盒子数.
pub fn min_box_count(voxels: &[Idx3d], shape: Idx3d, scale: usize, n_offsets: u32) -> usize {
    offsets(scale, n_offsets)
        .into_iter()
        .map(|o| count_boxes(voxels, shape, scale, o))
        .min()
        .unwrap_or(0)
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

        /// 借助 `rayon`, 并行地计算每个尺度下的最小盒子数. 结果与 `scales` 一一对应.
        pub fn box_counts(voxels: &[Idx3d], shape: Idx3d, scales: &[usize], n_offsets: u32) -> Vec<usize> {
            scales
                .par_iter()
                .map(|&s| min_box_count(voxels, shape, s, n_offsets))
                .collect()
        }
    } else {
        /// 计算每个尺度下的最小盒子数. 结果与 `scales` 一一对应.
        pub fn box_counts(voxels: &[Idx3d], shape: Idx3d, scales: &[usize], n_offsets: u32) -> Vec<usize> {
            scales
                .iter()
                .map(|&s| min_box_count(voxels, shape, s, n_offsets))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{box_counts, count_boxes, min_box_count, offsets};
    use crate::data::VoxelVolume;

    fn cube(side: usize, extent: usize) -> VoxelVolume {
        VoxelVolume::from_shape_fn((extent, extent, extent), |(z, h, w)| {
            z < side && h < side && w < side
        })
    }

    #[test]
    fn test_offsets() {
        assert_eq!(offsets(4, 0), vec![0.0]);
        assert_eq!(offsets(4, 1), vec![0.0]);
        assert_eq!(offsets(4, 3), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_filled_cube_counts() {
        let v = cube(8, 8);
        let voxels = v.occupied();
        for s in [1usize, 2, 4, 8] {
            assert_eq!(count_boxes(&voxels, v.shape(), s, 0.0), (8 / s).pow(3));
        }
        // 不整除的尺度向上取整.
        assert_eq!(count_boxes(&voxels, v.shape(), 3, 0.0), 27);
    }

    #[test]
    fn test_offset_shifts_grid() {
        // 单个体素位于 1, 边长 2: 偏移 0 时落在第 0 号箱, 偏移 1 时落在第 1 号箱.
        let mut v = VoxelVolume::empty((4, 4, 4));
        v.set((1, 1, 1), true);
        v.set((2, 2, 2), true);
        let voxels = v.occupied();
        assert_eq!(count_boxes(&voxels, v.shape(), 2, 0.0), 2);
        assert_eq!(count_boxes(&voxels, v.shape(), 2, 1.0), 1);
        assert_eq!(min_box_count(&voxels, v.shape(), 2, 0), 2);
        assert_eq!(min_box_count(&voxels, v.shape(), 2, 3), 1);
    }

    #[test]
    fn test_offsets_never_increase_minimum() {
        let v = VoxelVolume::from_shape_fn((12, 10, 9), |(z, h, w)| (z * 7 + h * 3 + w) % 5 == 0);
        let voxels = v.occupied();
        for s in 1..=8 {
            let plain = min_box_count(&voxels, v.shape(), s, 0);
            let searched = min_box_count(&voxels, v.shape(), s, 5);
            assert!(searched <= plain, "scale {s}: {searched} > {plain}");
        }
    }

    #[test]
    fn test_monotonic_in_scale() {
        let v = VoxelVolume::from_shape_fn((16, 16, 16), |(z, h, w)| {
            z == h || (w == 3 && z < 10) || (z + h + w) % 11 == 0
        });
        let voxels = v.occupied();
        let scales = [16, 8, 4, 2, 1];
        let counts = box_counts(&voxels, v.shape(), &scales, 0);
        assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{counts:?}");
        assert_eq!(counts[4], v.count());
    }

    #[test]
    fn test_empty_voxels() {
        assert_eq!(count_boxes(&[], (4, 4, 4), 2, 0.0), 0);
        assert_eq!(box_counts(&[], (4, 4, 4), &[4, 2], 2), vec![0, 0]);
    }
}
