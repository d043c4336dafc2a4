//! 气道形态学批处理.
//!
//! 对掩膜目录下的每个病例计算盒计数分形维数, 对分支表目录下的每个病例计算迂曲度,
//! 并将结果以 JSON 写入输出目录. 路径与开关见 [`utils::loader`].
//!
//! 日志级别默认为 `info`, 可由 `RUST_LOG` 覆盖.

mod result;
mod runner;

use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()?;

    let config = runner::Config::from_env()?;
    log::info!(
        "masks: {}, branch tables: {}, output: {}",
        config.mask_dir.display(),
        config.branch_dir.display(),
        config.output_dir.display()
    );

    let result = runner::run(&config)?;
    result.write_to(&config.output_dir)?;
    result.analyze()?;
    Ok(())
}
