//! 二值体素网格.

use ndarray::{Array3, ArrayD, ArrayView3, Ix3};
use std::ops::Index;

use crate::error::{CalcError, CalcResult};
use crate::Idx3d;

/// 三维布尔占据网格. `true` 代表前景 (被占据) 体素.
///
/// 该结构只关心体素索引空间, 不携带体素分辨率.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelVolume {
    data: Array3<bool>,
}

impl Index<Idx3d> for VoxelVolume {
    type Output = bool;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl From<Array3<bool>> for VoxelVolume {
    #[inline]
    fn from(data: Array3<bool>) -> Self {
        Self { data }
    }
}

impl VoxelVolume {
    /// 直接从三维布尔数组创建.
    #[inline]
    pub fn new(data: Array3<bool>) -> Self {
        Self { data }
    }

    /// 创建形状为 `shape` 的全背景网格.
    #[inline]
    pub fn empty(shape: Idx3d) -> Self {
        Self {
            data: Array3::from_elem(shape, false),
        }
    }

    /// 对每个索引调用 `f` 来决定该体素是否被占据.
    #[inline]
    pub fn from_shape_fn<F: FnMut(Idx3d) -> bool>(shape: Idx3d, f: F) -> Self {
        Self {
            data: Array3::from_shape_fn(shape, f),
        }
    }

    /// 从任意维度的布尔数组创建. 轴数不为 3 时返回 [`CalcError::ShapeMismatch`].
    pub fn from_dyn(data: ArrayD<bool>) -> CalcResult<Self> {
        let ndim = data.ndim();
        let data = data
            .into_dimensionality::<Ix3>()
            .map_err(|_| CalcError::ShapeMismatch(format!("expected 3 axes, got {ndim}")))?;
        Ok(Self { data })
    }

    /// 网格形状.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 最短轴的长度.
    #[inline]
    pub fn min_axis(&self) -> usize {
        let (a, b, c) = self.shape();
        a.min(b).min(c)
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, bool> {
        self.data.view()
    }

    /// 将索引 `pos` 处的体素设为 `value`. 越界时 panic.
    #[inline]
    pub fn set(&mut self, pos: Idx3d, value: bool) {
        self.data[pos] = value;
    }

    /// 前景体素个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|p| **p).count()
    }

    /// 是否不含任何前景体素.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|p| *p)
    }

    /// 收集所有前景体素的下标. 结果按行优先存储.
    pub fn occupied(&self) -> Vec<Idx3d> {
        self.data
            .indexed_iter()
            .filter_map(|(pos, p)| p.then_some(pos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::VoxelVolume;
    use crate::error::CalcError;
    use ndarray::ArrayD;

    #[test]
    fn test_from_dyn_checks_axes() {
        let flat = ArrayD::from_elem(vec![4, 4], true);
        let e = VoxelVolume::from_dyn(flat).unwrap_err();
        assert!(matches!(e, CalcError::ShapeMismatch(_)));

        let cube = ArrayD::from_elem(vec![2, 3, 4], true);
        let v = VoxelVolume::from_dyn(cube).unwrap();
        assert_eq!(v.shape(), (2, 3, 4));
        assert_eq!(v.min_axis(), 2);
        assert_eq!(v.count(), 24);
    }

    #[test]
    fn test_occupied() {
        let mut v = VoxelVolume::empty((3, 3, 3));
        assert!(v.is_empty());
        v.set((2, 0, 1), true);
        v.set((0, 1, 2), true);
        assert_eq!(v.occupied(), vec![(0, 1, 2), (2, 0, 1)]);
        assert!(v[(2, 0, 1)]);
        assert!(!v.is_empty());
    }
}
