//! 数据集操作.
//!
//! 病例以单个文件的形式平铺在目录中, 文件名去掉扩展名即病例 id.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

mod loader;

pub use loader::{mask_loader, MaskLoader};
#[cfg(feature = "serde")]
pub use loader::{branch_table_loader, BranchTableLoader};

/// 病例文件类型.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    /// NIfTI 掩膜, `*.nii` 或 `*.nii.gz`.
    NiftiMask,

    /// JSON 格式的分支表, `*.json`.
    BranchTable,
}

impl CaseKind {
    /// 该类型文件可能的扩展名 (含前导点), 较长者在前.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            CaseKind::NiftiMask => &[".nii.gz", ".nii"],
            CaseKind::BranchTable => &[".json"],
        }
    }

    /// `name` 是否为该类型的文件名.
    #[inline]
    pub fn matches(self, name: &str) -> bool {
        self.strip(name).is_some()
    }

    /// 去掉 `name` 的扩展名. 扩展名不匹配或去掉后为空时返回 `None`.
    fn strip(self, name: &str) -> Option<&str> {
        self.extensions()
            .iter()
            .find_map(|ext| name.strip_suffix(ext))
            .filter(|stem| !stem.is_empty())
    }
}

/// 病例 id: 文件名去掉 `.nii.gz`, `.nii` 或 `.json` 扩展名.
///
/// 文件名不是 UTF-8 或扩展名不在上述之列时返回 `None`.
pub fn case_id<P: AsRef<Path>>(path: P) -> Option<String> {
    let name = path.as_ref().file_name()?.to_str()?;
    [CaseKind::NiftiMask, CaseKind::BranchTable]
        .into_iter()
        .find_map(|kind| kind.strip(name))
        .map(str::to_owned)
}

/// 列出 `dir` 下 (不递归) 所有 `kind` 类型的普通文件, 按文件名排序.
pub fn case_files<P: AsRef<Path>>(dir: P, kind: CaseKind) -> io::Result<Vec<PathBuf>> {
    let mut ans = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let hit = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| kind.matches(n));
        if hit {
            ans.push(path);
        }
    }
    ans.sort_unstable();
    Ok(ans)
}

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}
