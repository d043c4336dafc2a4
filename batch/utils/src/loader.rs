//! 对 `airway-berry::dataset` 的更一层封装. 提供由环境变量决定的数据集路径与加载器.

use airway_berry::dataset::{self, BranchTableLoader, MaskLoader};
use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// 掩膜目录环境变量.
pub const MASK_DIR_ENV: &str = "AIRWAY_MASK_DIR";

/// 分支表目录环境变量.
pub const BRANCH_DIR_ENV: &str = "AIRWAY_BRANCH_DIR";

/// 输出目录环境变量.
pub const OUTPUT_DIR_ENV: &str = "AIRWAY_OUTPUT_DIR";

/// 按标签分区计算分形维数的开关.
pub const PER_LABEL_ENV: &str = "AIRWAY_PER_LABEL";

/// 输出分形拟合细节的开关.
pub const DUMP_FITS_ENV: &str = "AIRWAY_DUMP_FITS";

/// 若环境变量 `key` 非空则返回其值, 否则返回 `$HOME/dataset/airway/{leaf}`.
///
/// 两者都无法获得时返回 `None`.
fn dir_from_env_or_home(key: &str, leaf: &str) -> Option<PathBuf> {
    match env::var_os(key) {
        Some(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => dataset::home_dataset_dir_with(["airway", leaf]),
    }
}

/// 获取气道掩膜基本路径.
///
/// 1. 若环境变量 `$AIRWAY_MASK_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/airway/mask`.
#[inline]
pub fn mask_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home(MASK_DIR_ENV, "mask")
}

/// 获取分支表基本路径.
///
/// 1. 若环境变量 `$AIRWAY_BRANCH_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/airway/branch`.
#[inline]
pub fn branch_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home(BRANCH_DIR_ENV, "branch")
}

/// 获取输出路径.
///
/// 1. 若环境变量 `$AIRWAY_OUTPUT_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/airway/output`.
#[inline]
pub fn output_dir_from_env_or_home() -> Option<PathBuf> {
    dir_from_env_or_home(OUTPUT_DIR_ENV, "output")
}

/// 是否按标签分区计算分形维数 (`$AIRWAY_PER_LABEL`).
#[inline]
pub fn per_label_from_env() -> bool {
    crate::flag_from_env(PER_LABEL_ENV)
}

/// 是否输出分形拟合细节 (`$AIRWAY_DUMP_FITS`).
#[inline]
pub fn dump_fits_from_env() -> bool {
    crate::flag_from_env(DUMP_FITS_ENV)
}

/// 获取 `path` 下的掩膜加载器.
#[inline]
pub fn mask_loader<P: AsRef<Path>>(path: P) -> io::Result<MaskLoader> {
    dataset::mask_loader(path)
}

/// 获取 `path` 下的分支表加载器.
#[inline]
pub fn branch_table_loader<P: AsRef<Path>>(path: P) -> io::Result<BranchTableLoader> {
    dataset::branch_table_loader(path)
}
