//! # spherify 命令实现
//!
//! 对所有输入图像执行球面投影，保存和/或显示结果。
//!
//! ## 功能
//! - 解析参数为批次配置
//! - 运行前检查与确认
//! - 调度批处理，结束后统一显示结果
//! - 汇总统计、可选 CSV 报告和执行时间
//!
//! ## 依赖关系
//! - 使用 `cli::Cli` 定义的参数
//! - 使用 `batch/`, `sink/`, `imaging/viewer.rs`, `utils/`

use crate::batch::BatchEngine;
use crate::cli::Cli;
use crate::config::{OutputDimensions, SpherifyConfig, Strategy};
use crate::engine::{EngineCommand, SphereParams};
use crate::error::{Result, SpherifyError};
use crate::imaging::SystemViewer;
use crate::sink::{report, ResultSink};
use crate::utils::output::{self, Reporter};
use crate::utils::prompt::{Confirm, TerminalConfirm};

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// 默认引擎脚本文件名（与可执行文件同目录）
const DEFAULT_ENGINE_SCRIPT: &str = "spherify.jl";

/// 执行 spherify 命令
pub fn execute(args: Cli) -> Result<()> {
    let started = Instant::now();
    let reporter = Reporter::new(args.verbose);
    reporter.header("Sphere Projection");

    let config = build_config(&args)?;
    let engine = BatchEngine::new(&config, &reporter);

    let assume_yes = |_: &str| true;
    let confirm: &dyn Confirm = if args.yes { &assume_yes } else { &TerminalConfirm };
    match engine.preflight(confirm) {
        Err(SpherifyError::Aborted) => {
            println!("Aborted.");
            return Ok(());
        }
        other => other?,
    }

    // 确保输出目录存在
    if let Some(ref dir) = config.save_dir {
        fs::create_dir_all(dir).map_err(|e| SpherifyError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    let mut sink = ResultSink::from_config(&config);
    if config.display {
        sink = sink.with_viewer(Box::new(SystemViewer::new(args.viewer.clone())));
    }

    let batch = engine.run(&sink)?;

    // 全部处理完成后再显示
    let shown = sink.display_all(&batch, &reporter);
    if shown > 0 {
        reporter.info(&format!("Handed {} result(s) to the image viewer", shown));
    }

    let summary = batch.summary();
    reporter.separator();
    reporter.done(&format!(
        "Batch complete ({} file(s)): {} success, {} skipped, {} failed to save",
        summary.total(),
        summary.success,
        summary.skipped,
        summary.failed
    ));

    if reporter.is_verbose() {
        report::print_table(&batch);
    }

    if let Some(ref path) = args.report {
        report::write_csv(&batch, path)?;
        reporter.info(&format!("Report written to `{}`", path.display()));
    }

    if args.get_exec_time {
        println!(
            "Execution time: {:.1} s",
            started.elapsed().as_secs_f64()
        );
    }

    // 保存失败意味着用户要求的输出没有生成，必须上报
    if summary.failed > 0 {
        for (source, e) in batch.write_failures() {
            output::print_error(&format!("`{}`: {}", source.display(), e));
        }
        return Err(SpherifyError::Other(format!(
            "{} result(s) could not be saved",
            summary.failed
        )));
    }

    Ok(())
}

/// 由命令行参数构造批次配置
pub fn build_config(args: &Cli) -> Result<SpherifyConfig> {
    let script = match args.engine_script {
        Some(ref path) => path.clone(),
        None => default_engine_script()?,
    };

    let engine = EngineCommand::new(args.julia_binary.clone(), script);
    let mut config = SpherifyConfig::new(args.paths.clone(), engine);

    config.pattern = args.pattern.clone();
    config.save_dir = args.save_directory.clone();
    config.prefix = args.output_file_prefix.clone();
    config.display = !args.no_display;
    config.sphere = SphereParams {
        center: args.center_point,
        radius: args.radius,
        sampling_density: args.sampling_density,
        snapshot_width: args.snapshot_width,
        snapshot_height: args.snapshot_height,
    };
    if args.consecutive {
        config.strategy = Strategy::Sequential;
    }
    if args.legacy_output_size {
        config.output_dimensions = OutputDimensions::Source;
    }
    config.strict_exit = args.strict_exit;

    Ok(config)
}

/// 可执行文件同目录下的 `spherify.jl`
fn default_engine_script() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| {
        SpherifyError::InvalidArgument(format!(
            "Cannot locate the running executable ({}); pass --engine-script",
            e
        ))
    })?;

    Ok(exe
        .parent()
        .map(|dir| dir.join(DEFAULT_ENGINE_SCRIPT))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE_SCRIPT)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_build_config() {
        let cli = Cli::try_parse_from([
            "spherify",
            "-C",
            "-D",
            "--legacy-output-size",
            "--engine-script",
            "/opt/engine.jl",
            "-J",
            "/usr/local/bin/julia",
            "-c",
            "1,2,3",
            "a.png",
        ])
        .unwrap();

        let config = build_config(&cli).unwrap();
        assert_eq!(config.strategy, Strategy::Sequential);
        assert_eq!(config.output_dimensions, OutputDimensions::Source);
        assert!(!config.display);
        assert!(config.discards_results());
        assert_eq!(
            config.engine,
            EngineCommand::new("/usr/local/bin/julia", "/opt/engine.jl")
        );
        assert_eq!(config.sphere.center, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_default_script_next_to_executable() {
        let cli = Cli::try_parse_from(["spherify", "a.png"]).unwrap();
        if cli.engine_script.is_some() {
            // SPHERIFY_SCRIPT 已在环境中设置
            return;
        }
        let config = build_config(&cli).unwrap();
        assert_eq!(
            config.engine.script.file_name().unwrap(),
            DEFAULT_ENGINE_SCRIPT
        );
        assert_eq!(config.strategy, Strategy::Concurrent);
    }
}
