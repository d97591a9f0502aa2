//! # 批次配置
//!
//! 把命令行参数整理成一次批处理运行所需的不可变配置。
//!
//! ## 依赖关系
//! - 由 `commands/spherify.rs` 从 `cli::Cli` 构造
//! - 被 `batch/`, `sink/` 使用

use crate::engine::{EngineCommand, SphereParams};

use std::path::PathBuf;

/// 执行策略（每批次选择一次）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// 所有任务同时启动，在单线程调度器上交错执行
    Concurrent,
    /// 按输入顺序逐个执行
    Sequential,
}

/// 输出图像的重建尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputDimensions {
    /// 使用请求的快照尺寸（引擎契约）
    #[default]
    Snapshot,
    /// 使用源图像尺寸（旧行为）
    Source,
}

/// 一次批处理运行的完整配置
#[derive(Debug, Clone)]
pub struct SpherifyConfig {
    /// 输入路径（文件或目录）
    pub inputs: Vec<PathBuf>,
    /// 目录展开时的文件名匹配模式
    pub pattern: String,
    /// 保存目录
    pub save_dir: Option<PathBuf>,
    /// 输出文件名前缀
    pub prefix: String,
    /// 处理完成后显示结果
    pub display: bool,
    /// 球面投影参数
    pub sphere: SphereParams,
    /// 外部引擎
    pub engine: EngineCommand,
    pub strategy: Strategy,
    pub output_dimensions: OutputDimensions,
    /// 非零退出码视为失败
    pub strict_exit: bool,
}

impl SpherifyConfig {
    /// 默认配置（并发、快照尺寸、显示结果）
    pub fn new(inputs: Vec<PathBuf>, engine: EngineCommand) -> Self {
        Self {
            inputs,
            pattern: "*".to_string(),
            save_dir: None,
            prefix: "sph_".to_string(),
            display: true,
            sphere: SphereParams::default(),
            engine,
            strategy: Strategy::Concurrent,
            output_dimensions: OutputDimensions::Snapshot,
            strict_exit: false,
        }
    }

    /// 根据源图像尺寸确定输出尺寸
    pub fn output_size(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        match self.output_dimensions {
            OutputDimensions::Snapshot => (self.sphere.snapshot_width, self.sphere.snapshot_height),
            OutputDimensions::Source => (source_width, source_height),
        }
    }

    /// 结果既不显示也不保存
    pub fn discards_results(&self) -> bool {
        !self.display && self.save_dir.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_size() {
        let mut config = SpherifyConfig::new(vec![], EngineCommand::new("julia", "s.jl"));
        config.sphere.snapshot_width = 64;
        config.sphere.snapshot_height = 32;

        assert_eq!(config.output_size(10, 20), (64, 32));
        config.output_dimensions = OutputDimensions::Source;
        assert_eq!(config.output_size(10, 20), (10, 20));
    }

    #[test]
    fn test_discards_results() {
        let mut config = SpherifyConfig::new(vec![], EngineCommand::new("julia", "s.jl"));
        assert!(!config.discards_results());
        config.display = false;
        assert!(config.discards_results());
        config.save_dir = Some(PathBuf::from("out"));
        assert!(!config.discards_results());
    }
}
