//! 盒子尺度序列.

use itertools::Itertools;

use super::BoxCountSpec;
use crate::error::{CalcError, CalcResult};
use crate::Idx3d;

/// `[start, stop]` 闭区间上的 `num` 个等距点. 末点精确等于 `stop`.
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut ans: Vec<f64> = (0..num).map(|i| i as f64 * step + start).collect();
            ans[num - 1] = stop;
            ans
        }
    }
}

/// 为形状为 `shape` 的网格生成降序、去重后的整数盒子边长序列.
///
/// 指数在 `max_box_size` 与 `min_box_size` 之间等距取 `n_samples` 个,
/// 以 2 为底取幂后向下取整. 未指定 `max_box_size` 时取 `floor(log2(最短轴))`.
///
/// # 返回值
///
/// - 最短轴小于 `2^min_box_size` 时, 返回 `Err(CalcError::VolumeTooSmall)`;
/// - `max_box_size` 不小于 `usize::BITS` 时, 返回 `Err(CalcError::ExponentTooLarge)`;
/// - 去重后的尺度少于两个时, 返回 `Err(CalcError::TooFewScales)`;
/// - 其他情况下返回严格降序的尺度序列, 每个尺度至少为 1.
pub fn box_scales(shape: Idx3d, spec: &BoxCountSpec) -> CalcResult<Vec<usize>> {
    let (a, b, c) = shape;
    let min_axis = a.min(b).min(c);
    let min_box = 2f64.powi(spec.min_box_size());
    if (min_axis as f64) < min_box {
        return Err(CalcError::VolumeTooSmall(min_axis, min_box.floor() as usize));
    }

    if let Some(e) = spec.max_box_size().filter(|e| *e >= usize::BITS as i32) {
        return Err(CalcError::ExponentTooLarge(e));
    }
    let max_exp = spec
        .max_box_size()
        .map_or_else(|| (min_axis as f64).log2().floor(), f64::from);
    let min_exp = f64::from(spec.min_box_size());

    let scales: Vec<usize> = linspace(max_exp, min_exp, spec.n_samples() as usize)
        .into_iter()
        .map(|e| 2f64.powf(e).floor())
        .filter(|s| *s >= 1.0)
        .map(|s| s as usize)
        .sorted_unstable_by(|x, y| y.cmp(x))
        .dedup()
        .collect();

    if scales.len() < 2 {
        return Err(CalcError::TooFewScales(scales.len()));
    }
    Ok(scales)
}

#[cfg(test)]
mod tests {
    use super::{box_scales, linspace};
    use crate::error::CalcError;
    use crate::fractal::BoxCountSpec;

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 0.0, 1), vec![3.0]);
        assert_eq!(linspace(3.0, 0.0, 4), vec![3.0, 2.0, 1.0, 0.0]);
        assert_eq!(linspace(0.0, 4.0, 3), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_power_of_two_schedule() {
        let spec = BoxCountSpec::default()
            .with_min_box_size(0)
            .with_n_samples(4);
        assert_eq!(box_scales((8, 8, 8), &spec).unwrap(), vec![8, 4, 2, 1]);
    }

    #[test]
    fn test_floor_and_dedup() {
        // 2^(3 - 3i/19) 向下取整后只剩 8 个不同的值.
        let spec = BoxCountSpec::default().with_min_box_size(0);
        assert_eq!(
            box_scales((8, 9, 30), &spec).unwrap(),
            vec![8, 7, 6, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn test_default_spec() {
        // 默认最小边长为 2^1.
        let scales = box_scales((64, 80, 100), &BoxCountSpec::default()).unwrap();
        assert_eq!(scales.first(), Some(&64));
        assert_eq!(scales.last(), Some(&2));
        assert!(scales.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_explicit_max() {
        let spec = BoxCountSpec::default()
            .with_max_box_size(Some(2))
            .with_min_box_size(0)
            .with_n_samples(3);
        assert_eq!(box_scales((100, 100, 100), &spec).unwrap(), vec![4, 2, 1]);
    }

    #[test]
    fn test_degenerate_schedule() {
        let spec = BoxCountSpec::default();
        assert_eq!(
            box_scales((1, 8, 8), &spec).unwrap_err(),
            CalcError::VolumeTooSmall(1, 2)
        );
        assert_eq!(
            box_scales((0, 8, 8), &spec).unwrap_err(),
            CalcError::VolumeTooSmall(0, 2)
        );
        // 最短轴为 3: floor(log2(3)) = 1 = min_box_size, 只有一个尺度.
        assert_eq!(
            box_scales((3, 8, 8), &spec).unwrap_err(),
            CalcError::TooFewScales(1)
        );
        let spec = spec.with_n_samples(0);
        assert_eq!(
            box_scales((8, 8, 8), &spec).unwrap_err(),
            CalcError::TooFewScales(0)
        );
    }

    #[test]
    fn test_oversized_exponent() {
        let spec = BoxCountSpec::default().with_max_box_size(Some(200));
        assert_eq!(
            box_scales((8, 8, 8), &spec).unwrap_err(),
            CalcError::ExponentTooLarge(200)
        );
        let bits = usize::BITS as i32;
        let spec = spec.with_max_box_size(Some(bits));
        assert_eq!(
            box_scales((8, 8, 8), &spec).unwrap_err(),
            CalcError::ExponentTooLarge(bits)
        );

        // 大于网格但仍可表示的边长是允许的: 整个网格落在一个盒子里.
        let spec = spec.with_max_box_size(Some(5)).with_min_box_size(0).with_n_samples(6);
        assert_eq!(box_scales((8, 8, 8), &spec).unwrap(), vec![32, 16, 8, 4, 2, 1]);
    }
}
