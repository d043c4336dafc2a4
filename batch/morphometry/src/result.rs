//! 批处理结果.

use airway_berry::fractal::FitDiagnostics;
use airway_berry::tortuosity::Tortuosity;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// 分形维数输出文件名.
pub const FRACTAL_FILE: &str = "fractal_dimensions.json";

/// 迂曲度输出文件名.
pub const TORTUOSITY_FILE: &str = "tortuosity.json";

/// 分形拟合细节输出文件名.
pub const FITS_FILE: &str = "fractal_fits.json";

/// 单个病例的分形维数: 整体一个值, 或每个标签一个值.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FractalEntry {
    /// 整个掩膜.
    Whole(f64),

    /// `label_{k}` -> 分形维数.
    PerLabel(BTreeMap<String, f64>),
}

/// 单个病例的迂曲度: 整体一组值, 或每个标签一组值.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TortuosityEntry {
    /// 整棵骨架.
    Whole(Tortuosity),

    /// `label_{k}` -> 迂曲度.
    PerLabel(BTreeMap<String, Tortuosity>),
}

/// 被排除在汇总之外的病例 (或病例的某个标签).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseFailure {
    /// 病例 id, 按标签计算时形如 `{case}/label_{k}`.
    pub case: String,

    /// 失败原因.
    pub reason: String,
}

impl CaseFailure {
    pub fn new<E: std::fmt::Display>(case: impl Into<String>, reason: E) -> Self {
        Self {
            case: case.into(),
            reason: reason.to_string(),
        }
    }
}

/// 分形维数遍历结果.
#[derive(Debug, Default)]
pub struct FractalPass {
    pub dimensions: BTreeMap<String, FractalEntry>,
    pub fits: BTreeMap<String, FitDiagnostics>,
    pub failures: Vec<CaseFailure>,
}

/// 迂曲度遍历结果.
#[derive(Debug, Default)]
pub struct TortuosityPass {
    pub values: BTreeMap<String, TortuosityEntry>,
    pub failures: Vec<CaseFailure>,
}

/// 批处理最终结果.
#[derive(Debug, Default)]
pub struct MorphometryResult {
    pub fractal: Option<FractalPass>,
    pub tortuosity: Option<TortuosityPass>,
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, value)?;
    writeln!(&mut w)?;
    w.flush()?;
    Ok(())
}

impl MorphometryResult {
    /// 将结果写入 `dir`, 返回写出的文件.
    ///
    /// 没有运行的遍历不产生文件. 拟合细节为空时不写 [`FITS_FILE`].
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> anyhow::Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        let mut written = Vec::new();
        if let Some(f) = &self.fractal {
            let p = dir.join(FRACTAL_FILE);
            write_json(&p, &f.dimensions)?;
            written.push(p);

            if !f.fits.is_empty() {
                let p = dir.join(FITS_FILE);
                write_json(&p, &f.fits)?;
                written.push(p);
            }
        }
        if let Some(t) = &self.tortuosity {
            let p = dir.join(TORTUOSITY_FILE);
            write_json(&p, &t.values)?;
            written.push(p);
        }
        for p in written.iter() {
            log::info!("wrote {}", p.display());
        }
        Ok(written)
    }

    /// 将汇总信息写进 `w` 中.
    pub fn describe_into<W: Write>(&self, w: &mut W) -> io::Result<()> {
        const S4: &str = "    ";

        fn failures_into<W: Write>(w: &mut W, failures: &[CaseFailure]) -> io::Result<()> {
            for f in failures {
                writeln!(w, "{S4}{S4}{}: {}", f.case, f.reason)?;
            }
            Ok(())
        }

        match &self.fractal {
            Some(f) => {
                writeln!(w, "Fractal dimension:")?;
                writeln!(w, "{S4}Processed: {}", f.dimensions.len())?;
                writeln!(w, "{S4}Failed: {}", f.failures.len())?;
                failures_into(w, &f.failures)?;
            }
            None => writeln!(w, "Fractal dimension: skipped")?,
        }
        match &self.tortuosity {
            Some(t) => {
                writeln!(w, "Tortuosity:")?;
                writeln!(w, "{S4}Processed: {}", t.values.len())?;
                writeln!(w, "{S4}Failed: {}", t.failures.len())?;
                failures_into(w, &t.failures)?;
            }
            None => writeln!(w, "Tortuosity: skipped")?,
        }
        Ok(())
    }

    /// 打印汇总信息.
    pub fn analyze(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        utils::sep_to(&mut out)?;
        self.describe_into(&mut out)?;
        utils::sep_to(&mut out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MorphometryResult {
        let mut fractal = FractalPass::default();
        fractal
            .dimensions
            .insert("case_01".to_owned(), FractalEntry::Whole(2.5));
        fractal.dimensions.insert(
            "case_02".to_owned(),
            FractalEntry::PerLabel(BTreeMap::from([
                ("label_1".to_owned(), 2.25),
                ("label_2".to_owned(), 1.5),
            ])),
        );
        fractal
            .failures
            .push(CaseFailure::new("case_03", "volume has no occupied voxel"));

        let mut tortuosity = TortuosityPass::default();
        tortuosity.values.insert(
            "case_01".to_owned(),
            TortuosityEntry::Whole(Tortuosity {
                mean: 1.5,
                weighted: 1.25,
            }),
        );
        tortuosity.values.insert(
            "case_02".to_owned(),
            TortuosityEntry::PerLabel(BTreeMap::from([(
                "label_3".to_owned(),
                Tortuosity {
                    mean: 2.0,
                    weighted: 1.75,
                },
            )])),
        );

        MorphometryResult {
            fractal: Some(fractal),
            tortuosity: Some(tortuosity),
        }
    }

    #[test]
    fn test_json_layout() {
        let r = sample();
        let f = serde_json::to_value(&r.fractal.as_ref().unwrap().dimensions).unwrap();
        assert_eq!(
            f,
            serde_json::json!({
                "case_01": 2.5,
                "case_02": {"label_1": 2.25, "label_2": 1.5},
            })
        );

        let t = serde_json::to_value(&r.tortuosity.as_ref().unwrap().values).unwrap();
        assert_eq!(
            t,
            serde_json::json!({
                "case_01": {"mean_tortuosity": 1.5, "weighted_tortuosity": 1.25},
                "case_02": {"label_3": {"mean_tortuosity": 2.0, "weighted_tortuosity": 1.75}},
            })
        );
    }

    #[test]
    fn test_write_to() {
        let dir = std::env::temp_dir().join(format!("morphometry-{}-write", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let written = sample().write_to(&dir).unwrap();
        assert_eq!(
            written,
            vec![dir.join(FRACTAL_FILE), dir.join(TORTUOSITY_FILE)]
        );
        let text = fs::read_to_string(dir.join(TORTUOSITY_FILE)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["case_01"]["weighted_tortuosity"], 1.25);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_describe() {
        let mut buf = Vec::new();
        let r = MorphometryResult {
            tortuosity: None,
            ..sample()
        };
        r.describe_into(&mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("Processed: 2"));
        assert!(s.contains("case_03: volume has no occupied voxel"));
        assert!(s.contains("Tortuosity: skipped"));
    }
}
