//! 迭代器风格的病例加载器.
//!
//! 单个病例加载失败不会中断迭代, 错误随病例 id 一起返回.

use std::io;
use std::path::{Path, PathBuf};

use super::{case_files, case_id, CaseKind};
use crate::data::AirwayMask;
use crate::error::LoadError;

#[cfg(feature = "serde")]
use crate::tortuosity::BranchTable;

/// 病例文件路径, 逆序存放以便 `pop`.
#[derive(Debug)]
struct Cases {
    files_rev: Vec<PathBuf>,
}

impl Cases {
    fn new(dir: &Path, kind: CaseKind) -> io::Result<Self> {
        let mut files_rev = case_files(dir, kind)?;
        files_rev.reverse();
        Ok(Self { files_rev })
    }

    fn next_with<T, F>(&mut self, open: F) -> Option<(String, Result<T, LoadError>)>
    where
        F: FnOnce(&Path) -> Result<T, LoadError>,
    {
        let path = self.files_rev.pop()?;
        // `case_files` 只返回扩展名匹配的文件, 因此 id 总能取到.
        let id = case_id(&path).unwrap_or_default();
        Some((id, open(path.as_path())))
    }
}

/// 创建 `dir` 下所有 NIfTI 掩膜 ([`AirwayMask`]) 的加载器, 按文件名顺序迭代.
pub fn mask_loader<P: AsRef<Path>>(dir: P) -> io::Result<MaskLoader> {
    Ok(MaskLoader {
        cases: Cases::new(dir.as_ref(), CaseKind::NiftiMask)?,
    })
}

/// NIfTI 掩膜加载器.
#[derive(Debug)]
pub struct MaskLoader {
    cases: Cases,
}

impl Iterator for MaskLoader {
    type Item = (String, Result<AirwayMask, LoadError>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cases.next_with(|p| AirwayMask::open(p))
    }
}

impl ExactSizeIterator for MaskLoader {
    #[inline]
    fn len(&self) -> usize {
        self.cases.files_rev.len()
    }
}

/// 创建 `dir` 下所有分支表 ([`BranchTable`]) 的加载器, 按文件名顺序迭代.
#[cfg(feature = "serde")]
pub fn branch_table_loader<P: AsRef<Path>>(dir: P) -> io::Result<BranchTableLoader> {
    Ok(BranchTableLoader {
        cases: Cases::new(dir.as_ref(), CaseKind::BranchTable)?,
    })
}

/// 分支表加载器.
#[cfg(feature = "serde")]
#[derive(Debug)]
pub struct BranchTableLoader {
    cases: Cases,
}

#[cfg(feature = "serde")]
impl Iterator for BranchTableLoader {
    type Item = (String, Result<BranchTable, LoadError>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cases.next_with(|p| BranchTable::open(p))
    }
}

#[cfg(feature = "serde")]
impl ExactSizeIterator for BranchTableLoader {
    #[inline]
    fn len(&self) -> usize {
        self.cases.files_rev.len()
    }
}
