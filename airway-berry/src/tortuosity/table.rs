//! 分支表适配层.
//!
//! 外部骨架汇总工具以 JSON 记录数组的形式输出分支表, 每一行是一个对象.
//! 规范列名为 `coord-src-{0,1,2}`, `coord-dst-{0,1,2}` 和 `branch-distance`;
//! 部分版本使用下划线分隔 (`coord_src_0`, `branch_distance`), 在这里统一.
//! 其他列会被忽略.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use serde_json::Value;

use super::{tortuosity, BranchRecord, Tortuosity};
use crate::error::{CalcError, CalcResult, LoadError};

/// 分支表中的一行.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
struct BranchRow {
    #[serde(rename = "coord-src-0", alias = "coord_src_0")]
    src0: f64,
    #[serde(rename = "coord-src-1", alias = "coord_src_1")]
    src1: f64,
    #[serde(rename = "coord-src-2", alias = "coord_src_2")]
    src2: f64,
    #[serde(rename = "coord-dst-0", alias = "coord_dst_0")]
    dst0: f64,
    #[serde(rename = "coord-dst-1", alias = "coord_dst_1")]
    dst1: f64,
    #[serde(rename = "coord-dst-2", alias = "coord_dst_2")]
    dst2: f64,
    #[serde(rename = "branch-distance", alias = "branch_distance")]
    branch_distance: f64,
}

impl From<BranchRow> for BranchRecord {
    #[inline]
    fn from(r: BranchRow) -> Self {
        BranchRecord::new(
            [r.src0, r.src1, r.src2],
            [r.dst0, r.dst1, r.dst2],
            r.branch_distance,
        )
    }
}

impl From<&BranchRecord> for BranchRow {
    #[inline]
    fn from(b: &BranchRecord) -> Self {
        let [src0, src1, src2] = b.src;
        let [dst0, dst1, dst2] = b.dst;
        Self {
            src0,
            src1,
            src2,
            dst0,
            dst1,
            dst2,
            branch_distance: b.path_length,
        }
    }
}

/// 整体解析失败 (语法错误, 顶层不是数组等) 属于 JSON 错误, I/O 问题原样返回.
fn classify(e: serde_json::Error) -> LoadError {
    match e.classify() {
        Category::Io => LoadError::Io(e.into()),
        Category::Syntax | Category::Eof | Category::Data => LoadError::Json(e),
    }
}

/// 逐行转换. 行内缺列或类型错误属于形状不匹配.
fn rows_to_records(rows: Vec<Value>) -> Result<Vec<BranchRecord>, LoadError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            BranchRow::deserialize(row)
                .map(BranchRecord::from)
                .map_err(|e| {
                    LoadError::from(CalcError::ShapeMismatch(format!("branch table row {i}: {e}")))
                })
        })
        .collect()
}

/// 已规范化的分支表.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchTable {
    records: Vec<BranchRecord>,
}

impl From<Vec<BranchRecord>> for BranchTable {
    #[inline]
    fn from(records: Vec<BranchRecord>) -> Self {
        Self { records }
    }
}

impl BranchTable {
    /// 从 JSON 文本解析分支表.
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        let rows: Vec<Value> = serde_json::from_str(s).map_err(classify)?;
        Ok(Self::from(rows_to_records(rows)?))
    }

    /// 从 `reader` 读取 JSON 格式的分支表.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let rows: Vec<Value> = serde_json::from_reader(reader).map_err(classify)?;
        Ok(Self::from(rows_to_records(rows)?))
    }

    /// 打开 JSON 格式的分支表文件.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// 以规范列名输出 JSON 文本.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        let rows: Vec<BranchRow> = self.records.iter().map(BranchRow::from).collect();
        serde_json::to_string(&rows)
    }

    /// 全部分支.
    #[inline]
    pub fn records(&self) -> &[BranchRecord] {
        &self.records
    }

    /// 分支个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 是否没有任何分支.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 计算该分支表的迂曲度. 见 [`tortuosity`].
    #[inline]
    pub fn tortuosity(&self, length_threshold: f64) -> CalcResult<Tortuosity> {
        tortuosity(&self.records, length_threshold)
    }
}
