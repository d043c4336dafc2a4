//! 程序运行函数.

use crate::result::{
    CaseFailure, FractalEntry, FractalPass, MorphometryResult, TortuosityEntry, TortuosityPass,
};
use airway_berry::consts::DEFAULT_LENGTH_THRESHOLD;
use airway_berry::fractal::{fractal_dimension_with_diagnostics, BoxCountSpec, FitDiagnostics};
use airway_berry::tortuosity::Tortuosity;
use airway_berry::{AirwayMask, CalcResult};
use anyhow::{anyhow, bail};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use utils::loader;

/// 运行配置.
#[derive(Debug, Clone)]
pub struct Config {
    pub mask_dir: PathBuf,
    pub branch_dir: PathBuf,
    pub output_dir: PathBuf,
    pub per_label: bool,
    pub dump_fits: bool,
    pub spec: BoxCountSpec,
    pub length_threshold: f64,
}

impl Config {
    /// 从环境变量读取配置. 缺省参数取库默认值.
    pub fn from_env() -> anyhow::Result<Self> {
        let no_home = || anyhow!("cannot resolve the home directory, set the AIRWAY_*_DIR variables");
        Ok(Self {
            mask_dir: loader::mask_dir_from_env_or_home().ok_or_else(no_home)?,
            branch_dir: loader::branch_dir_from_env_or_home().ok_or_else(no_home)?,
            output_dir: loader::output_dir_from_env_or_home().ok_or_else(no_home)?,
            per_label: loader::per_label_from_env(),
            dump_fits: loader::dump_fits_from_env(),
            spec: BoxCountSpec::default(),
            length_threshold: DEFAULT_LENGTH_THRESHOLD,
        })
    }
}

/// 计算单个掩膜的分形维数.
///
/// 非按标签模式下返回一项, 键为 `None`; 按标签模式下每个非零标签一项,
/// 键为 `label_{k}`.
pub fn measure_mask(
    mask: &AirwayMask,
    per_label: bool,
    spec: &BoxCountSpec,
) -> Vec<(Option<String>, CalcResult<FitDiagnostics>)> {
    if per_label {
        mask.labels()
            .into_iter()
            .map(|k| {
                let fit = fractal_dimension_with_diagnostics(&mask.region(k), spec);
                (Some(format!("label_{k}")), fit)
            })
            .collect()
    } else {
        vec![(None, fractal_dimension_with_diagnostics(&mask.volume(), spec))]
    }
}

/// 把单个病例的结果并入 `pass`. 失败项记录警告后排除.
fn merge_case(
    pass: &mut FractalPass,
    id: String,
    items: Vec<(Option<String>, CalcResult<FitDiagnostics>)>,
    dump_fits: bool,
) {
    let mut labels = BTreeMap::new();
    let mut whole = None;
    for (label, fit) in items {
        let key = match &label {
            Some(l) => format!("{id}/{l}"),
            None => id.clone(),
        };
        match fit {
            Ok(diag) => {
                log::debug!("{key}: fractal dimension {:.4}", diag.dimension());
                match label {
                    Some(l) => {
                        labels.insert(l, diag.dimension());
                    }
                    None => whole = Some(diag.dimension()),
                }
                if dump_fits {
                    pass.fits.insert(key, diag);
                }
            }
            Err(e) => {
                log::warn!("{key}: fractal dimension skipped: {e}");
                pass.failures.push(CaseFailure::new(key, e));
            }
        }
    }

    if let Some(d) = whole {
        pass.dimensions.insert(id, FractalEntry::Whole(d));
    } else if !labels.is_empty() {
        pass.dimensions.insert(id, FractalEntry::PerLabel(labels));
    }
}

/// 遍历 `dir` 下的所有掩膜并计算分形维数.
pub fn fractal_pass(
    dir: &Path,
    per_label: bool,
    dump_fits: bool,
    spec: &BoxCountSpec,
) -> io::Result<FractalPass> {
    let cases = loader::mask_loader(dir)?;
    log::info!("fractal pass: {} mask(s) under {}", cases.len(), dir.display());

    let mut pass = FractalPass::default();
    for (id, mask) in cases {
        match mask {
            Ok(mask) => {
                let items = measure_mask(&mask, per_label, spec);
                if items.is_empty() {
                    log::warn!("{id}: fractal dimension skipped: no labelled voxel");
                    pass.failures.push(CaseFailure::new(id, "no labelled voxel"));
                } else {
                    merge_case(&mut pass, id, items, dump_fits);
                }
            }
            Err(e) => {
                log::warn!("{id}: cannot load mask: {e}");
                pass.failures.push(CaseFailure::new(id, e));
            }
        }
    }
    Ok(pass)
}

/// 按标签拆分的分支表以 `{case}_label_{k}` 命名, 拆出 `(case, "label_{k}")`.
pub fn split_label_id(id: &str) -> Option<(&str, String)> {
    let (case, k) = id.rsplit_once("_label_")?;
    let k: u8 = k.parse().ok()?;
    (!case.is_empty()).then(|| (case, format!("label_{k}")))
}

/// 遍历 `dir` 下的所有分支表并计算迂曲度.
///
/// 按标签模式下, 同一病例的各标签分支表汇总为一项; 文件名不带标签后缀的病例记为失败.
pub fn tortuosity_pass(
    dir: &Path,
    per_label: bool,
    length_threshold: f64,
) -> io::Result<TortuosityPass> {
    let cases = loader::branch_table_loader(dir)?;
    log::info!("tortuosity pass: {} table(s) under {}", cases.len(), dir.display());

    let mut pass = TortuosityPass::default();
    let mut labelled: BTreeMap<String, BTreeMap<String, Tortuosity>> = BTreeMap::new();
    for (id, table) in cases {
        let t = table
            .map_err(|e| e.to_string())
            .and_then(|t| t.tortuosity(length_threshold).map_err(|e| e.to_string()));
        let t = match t {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{id}: tortuosity skipped: {e}");
                pass.failures.push(CaseFailure::new(id, e));
                continue;
            }
        };
        log::debug!("{id}: tortuosity {:.4} / {:.4}", t.mean, t.weighted);

        if !per_label {
            pass.values.insert(id, TortuosityEntry::Whole(t));
            continue;
        }
        match split_label_id(&id) {
            Some((case, label)) => {
                labelled.entry(case.to_owned()).or_default().insert(label, t);
            }
            None => {
                log::warn!("{id}: tortuosity skipped: no `_label_{{k}}` suffix");
                pass.failures.push(CaseFailure::new(id, "no label suffix"));
            }
        }
    }

    pass.values.extend(
        labelled
            .into_iter()
            .map(|(case, labels)| (case, TortuosityEntry::PerLabel(labels))),
    );
    Ok(pass)
}

/// 目录不可读时跳过该遍历.
fn skip_unreadable<T>(name: &str, dir: &Path, r: io::Result<T>) -> Option<T> {
    r.map_err(|e| log::warn!("{name} pass skipped, cannot read {}: {e}", dir.display()))
        .ok()
}

/// 实际运行. 两个遍历在各自的线程中进行.
pub fn run(config: &Config) -> anyhow::Result<MorphometryResult> {
    log::info!("Running morphometry...");
    let (fractal, tortuosity) = thread::scope(|s| {
        let fractal = s.spawn(|| {
            fractal_pass(
                &config.mask_dir,
                config.per_label,
                config.dump_fits,
                &config.spec,
            )
        });
        let tortuosity = s.spawn(|| {
            tortuosity_pass(&config.branch_dir, config.per_label, config.length_threshold)
        });
        (fractal.join(), tortuosity.join())
    });

    let fractal = fractal.map_err(|_| anyhow!("fractal pass panicked"))?;
    let tortuosity = tortuosity.map_err(|_| anyhow!("tortuosity pass panicked"))?;

    let result = MorphometryResult {
        fractal: skip_unreadable("fractal", &config.mask_dir, fractal),
        tortuosity: skip_unreadable("tortuosity", &config.branch_dir, tortuosity),
    };
    if result.fractal.is_none() && result.tortuosity.is_none() {
        bail!("neither mask nor branch table directory is readable");
    }
    Ok(result)
}
