//! 🫁欢迎光临🌿
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx3d;

pub use crate::data::{AirwayMask, NiftiHeaderAttr, VoxelVolume};

pub use crate::consts::gray::BACKGROUND;
pub use crate::consts::{
    DEFAULT_LENGTH_THRESHOLD, DEFAULT_MIN_BOX_EXP, DEFAULT_OFFSETS, DEFAULT_SAMPLES,
};

pub use crate::error::{CalcError, CalcResult, LoadError};

pub use crate::fractal::{
    fractal_dimension, fractal_dimension_with_diagnostics, BoxCountSpec, FitDiagnostics,
    ScaleCountPoint,
};

pub use crate::tortuosity::{
    region_tortuosity, skeleton_tortuosity, tortuosity, BranchRecord, Skeletonize,
    SummarizeSkeleton, Tortuosity,
};
#[cfg(feature = "serde")]
pub use crate::tortuosity::BranchTable;

pub use crate::dataset::{self, case_files, case_id, home_dataset_dir_with, CaseKind};
