use std::collections::BTreeSet;
use std::ops::Index;
use std::path::Path;

use ndarray::{Array3, ArrayView, Ix3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use crate::consts::gray::*;
use crate::error::{CalcError, LoadError};
use crate::Idx3d;

mod volume;

pub use volume::VoxelVolume;

/// `NiftiHeader` 是栈上大对象, 移动该对象的开销很可观.
/// 因此我们将其分配到堆上.
type BoxedHeader = Box<NiftiHeader>;

/// 将 (W, H, z) 转换成 (z, H, W). 以后均按照该模式访问.
#[inline]
fn get_shape_from_header(h: &NiftiHeader) -> Idx3d {
    // [W, H, z]. 体素个数数组.
    let [_, w, h, z, ..] = h.dim;
    (z as usize, h as usize, w as usize)
}

/// 3D nii 文件 header 的共用属性和部分通用操作.
pub trait NiftiHeaderAttr {
    /// 获取 header 部分.
    fn header(&self) -> &NiftiHeader;

    /// 获取数据形状大小.
    #[inline]
    fn shape(&self) -> Idx3d {
        get_shape_from_header(self.header())
    }

    /// 获取单个体素分辨率. 该分辨率以毫米为单位, 分别代表空间 (相邻切片方向),
    /// 高 (自然图像的垂直方向), 宽 (自然图像的水平方向).
    ///
    /// 顺序与 [`Self::shape`] 一致, 可直接作为骨架汇总的 `spacing` 使用.
    #[inline]
    fn pix_dim(&self) -> [f64; 3] {
        let [_, w, h, z, ..] = self.header().pixdim;
        [z as f64, h as f64, w as f64]
    }
}

/// nii 格式 3D 气道分割掩膜, 包括 header 和标签. 标签值以 `u8` 保存.
///
/// 二值掩膜中前景为 1; 带区域划分的掩膜可以有多个非零标签.
#[derive(Debug, Clone)]
pub struct AirwayMask {
    header: BoxedHeader,
    data: Array3<u8>,
}

impl NiftiHeaderAttr for AirwayMask {
    #[inline]
    fn header(&self) -> &NiftiHeader {
        &self.header
    }
}

impl Index<Idx3d> for AirwayMask {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl AirwayMask {
    /// 打开 nii (或 nii.gz) 文件格式的 3D 掩膜. `path` 为文件的本地路径.
    /// 如果打开成功, 则返回 `Ok(Self)`, 否则返回 `Err`.
    ///
    /// 数据维度不为 3 时返回 [`CalcError::ShapeMismatch`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let obj = ReaderOptions::new().read_file(path.as_ref())?;
        let header = Box::new(obj.header().clone());

        let data = obj.into_volume().into_ndarray::<u8>()?;
        let ndim = data.ndim();
        let data = data
            .into_dimensionality::<Ix3>()
            .map_err(|_| CalcError::ShapeMismatch(format!("expected 3 axes, got {ndim}")))?;

        // [W, H, z] -> [z, H, W]
        // hint: 原第一维向下增长, 原第二维向右增长.
        let data = data.permuted_axes([2, 1, 0]);
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        debug_assert_eq!(data.dim(), get_shape_from_header(&header));

        Ok(Self { header, data })
    }

    /// 根据裸标签数据和体素分辨率直接创建 `AirwayMask` 实体.
    ///
    /// # 参数
    ///
    /// 1. `data` 按照 \[z, h, w\] 格式存储, 与 [`Self::data`] 的布局一致.
    /// 2. `pix_dim` 同样按照 \[z, h, w\] 格式存储, 单位为毫米.
    ///
    /// # 注意
    ///
    /// 该方法不读取任何文件, 因此你应仅将其用于实验或测试目的.
    pub fn fake(data: Array3<u8>, pix_dim: [f32; 3]) -> Self {
        let (z, h, w) = data.dim();
        let mut header = Box::<NiftiHeader>::default();
        header.dim = [3, w as u16, h as u16, z as u16, 1, 1, 1, 1];
        let [_, pw, ph, pz, ..] = &mut header.pixdim;
        let [dz, dh, dw] = pix_dim;
        (*pw, *ph, *pz) = (dw, dh, dz);
        header.intent_name[..4].copy_from_slice(b"fake");
        Self { header, data }
    }

    /// 判断该结构是否是由 `fake` 方法手动拼接的.
    pub fn is_faked(&self) -> bool {
        self.header.intent_name.starts_with(b"fake")
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView<'_, u8, Ix3> {
        self.data.view()
    }

    /// 获取 3D 掩膜中值为 `label` 的体素个数.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|p| **p == label).count()
    }

    /// 掩膜中出现过的全部非零标签, 升序排列.
    pub fn labels(&self) -> Vec<u8> {
        self.data
            .iter()
            .copied()
            .filter(|p| is_foreground(*p))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 将所有非零体素视为前景, 得到完整结构的占据网格.
    #[inline]
    pub fn volume(&self) -> VoxelVolume {
        VoxelVolume::new(self.data.mapv(is_foreground))
    }

    /// 仅将值为 `label` 的体素视为前景, 得到单个区域的占据网格.
    #[inline]
    pub fn region(&self, label: u8) -> VoxelVolume {
        VoxelVolume::new(self.data.mapv(|p| p == label))
    }
}

#[cfg(test)]
mod tests {
    use super::{AirwayMask, NiftiHeaderAttr};
    use ndarray::Array3;

    fn two_region_mask() -> AirwayMask {
        let mut data = Array3::<u8>::zeros((4, 5, 6));
        data[(0, 0, 0)] = 1;
        data[(1, 2, 3)] = 1;
        data[(3, 4, 5)] = 4;
        AirwayMask::fake(data, [2.5, 0.7, 0.7])
    }

    #[test]
    fn test_fake_header() {
        let m = two_region_mask();
        assert!(m.is_faked());
        assert_eq!(m.shape(), (4, 5, 6));
        assert_eq!(m.pix_dim(), [2.5, 0.7f32 as f64, 0.7f32 as f64]);
    }

    #[test]
    fn test_labels_and_regions() {
        let m = two_region_mask();
        assert_eq!(m.labels(), vec![1, 4]);
        assert_eq!(m.count(1), 2);
        assert_eq!(m.volume().count(), 3);
        assert_eq!(m.region(1).occupied(), vec![(0, 0, 0), (1, 2, 3)]);
        assert_eq!(m.region(4).occupied(), vec![(3, 4, 5)]);
        assert!(m.region(2).is_empty());
        assert_eq!(m[(3, 4, 5)], 4);
    }
}
