//! # 批量执行器
//!
//! 展开输入目标，按选定策略调度每个目标的处理流水线，汇总结果。
//!
//! ## 功能
//! - 运行前检查（结果既不显示也不保存时需要确认）
//! - 并发模式：所有任务同时启动，在单线程 tokio 调度器上交错执行
//! - 顺序模式：按输入顺序逐个执行，子进程交换完成后才开始下一个
//! - 进度条显示，单个目标失败不影响其他目标
//!
//! ## 依赖关系
//! - 被 `commands/spherify.rs` 调用
//! - 使用 `batch/collector.rs`, `batch/pipeline.rs`, `engine/runner.rs`
//! - 使用 `tokio` 运行时, `futures::future::join_all`

use super::collector::FileCollector;
use super::outcome::BatchReport;
use super::pipeline::Pipeline;
use crate::config::{SpherifyConfig, Strategy};
use crate::engine::{AsyncExchange, BlockingExchange, ProcessExchange};
use crate::error::{Result, SpherifyError};
use crate::sink::ResultSink;
use crate::utils::output::Reporter;
use crate::utils::prompt::Confirm;

use futures::future::join_all;
use std::path::PathBuf;

/// 批量执行器
pub struct BatchEngine<'a> {
    config: &'a SpherifyConfig,
    reporter: &'a Reporter,
}

impl<'a> BatchEngine<'a> {
    /// 创建新的批量执行器
    pub fn new(config: &'a SpherifyConfig, reporter: &'a Reporter) -> Self {
        Self { config, reporter }
    }

    /// 运行前检查
    ///
    /// 结果既不显示也不保存时发出警告并请求确认，拒绝则返回 `Aborted`。
    pub fn preflight(&self, confirm: &dyn Confirm) -> Result<()> {
        if !self.config.engine.script.exists() {
            self.reporter.warning(&format!(
                "Engine script `{}` does not exist",
                self.config.engine.script.display()
            ));
        }

        if self.config.discards_results() {
            self.reporter
                .warning("The results will be neither displayed nor saved.");
            if !confirm.confirm("Are you sure this is what you want?") {
                return Err(SpherifyError::Aborted);
            }
        }

        Ok(())
    }

    /// 展开输入目标为候选文件列表
    pub fn candidates(&self) -> Result<Vec<PathBuf>> {
        let collector =
            FileCollector::new(self.config.inputs.clone()).with_pattern(&self.config.pattern)?;
        Ok(collector.collect(self.reporter))
    }

    /// 执行整个批次（阻塞直到所有任务完成）
    pub fn run(&self, sink: &ResultSink) -> Result<BatchReport> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SpherifyError::Other(format!("Failed to start async runtime: {}", e)))?;

        let exchange: Box<dyn ProcessExchange> = match self.config.strategy {
            Strategy::Concurrent => Box::new(AsyncExchange),
            Strategy::Sequential => Box::new(BlockingExchange),
        };

        let candidates = self.candidates()?;
        Ok(runtime.block_on(self.dispatch(candidates, exchange.as_ref(), sink)))
    }

    /// 按策略调度所有候选文件
    pub async fn dispatch(
        &self,
        candidates: Vec<PathBuf>,
        exchange: &dyn ProcessExchange,
        sink: &ResultSink,
    ) -> BatchReport {
        let pipeline = Pipeline {
            config: self.config,
            exchange,
            sink,
            reporter: self.reporter,
        };

        self.reporter.info(&format!(
            "Processing {} file(s) in {} mode",
            candidates.len(),
            exchange.mode()
        ));
        self.reporter
            .start_progress(candidates.len() as u64, "Spherifying");

        let records = match self.config.strategy {
            Strategy::Concurrent => {
                join_all(candidates.into_iter().map(|file| pipeline.process(file))).await
            }
            Strategy::Sequential => {
                let mut records = Vec::with_capacity(candidates.len());
                for file in candidates {
                    records.push(pipeline.process(file).await);
                }
                records
            }
        };

        self.reporter.finish_progress();

        BatchReport::new(records)
    }
}
