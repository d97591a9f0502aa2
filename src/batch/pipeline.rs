//! # 单目标处理流水线
//!
//! 加载 → 构造调用参数 → 调用外部引擎 → 重建图像 → 可选保存。
//!
//! 流水线只依赖抽象的 `ProcessExchange`，并发与顺序两种模式共用同一份逻辑。
//! 每个任务独占自己的图像、文件句柄和子进程，任务之间不共享可变状态。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `engine/`, `imaging/`, `sink/`

use super::outcome::OutcomeRecord;
use crate::config::SpherifyConfig;
use crate::engine::{EngineInvocation, ProcessExchange};
use crate::error::{Result, SpherifyError};
use crate::imaging::{self, LoadedImage};
use crate::sink::ResultSink;
use crate::utils::output::Reporter;

use std::path::{Path, PathBuf};

/// 单目标处理流水线
pub struct Pipeline<'a> {
    pub config: &'a SpherifyConfig,
    pub exchange: &'a dyn ProcessExchange,
    pub sink: &'a ResultSink,
    pub reporter: &'a Reporter,
}

impl Pipeline<'_> {
    /// 处理一个候选文件；失败被吸收为缺失结果，不会中断其他任务
    pub async fn process(&self, source: PathBuf) -> OutcomeRecord {
        let record = match self.spherify(&source).await {
            Ok(image) => {
                let persisted = self.sink.persist(&image, &source, self.reporter);
                OutcomeRecord::present(source, image, persisted)
            }
            Err(e) => {
                self.report_skip(&source, &e);
                OutcomeRecord::absent(source, e)
            }
        };
        self.reporter.advance();
        record
    }

    /// 加载、调用引擎并重建输出图像
    async fn spherify(&self, source: &Path) -> Result<LoadedImage> {
        let size = std::fs::metadata(source).map(|m| m.len()).unwrap_or(0);
        self.reporter
            .info(&format!("Opening `{}` ({} bytes)", source.display(), size));

        let image = imaging::load(source)?;
        self.reporter.info(&format!(
            "Image of size {} x {} pixels loaded ({} bytes as RGBA)",
            image.width(),
            image.height(),
            image.byte_len()
        ));

        let invocation = EngineInvocation::new(
            &self.config.engine,
            self.config.sphere,
            image.width(),
            image.height(),
        );
        self.reporter.info(&format!(
            "Launching subprocess ({}): `{}`",
            self.exchange.mode(),
            invocation.command_line()
        ));

        let (width, height) = self.config.output_size(image.width(), image.height());
        let input = imaging::to_bytes(&image);
        // 输入图像在交换前释放
        drop(image);
        debug_assert_eq!(input.len(), invocation.expected_input_len());

        let result = self.exchange.invoke(&invocation, input).await?;
        let pixels = result.into_pixels(self.config.strict_exit)?;
        self.reporter.info(&format!(
            "Received {} bytes from `{}`",
            pixels.len(),
            invocation.program()
        ));

        let output = imaging::from_bytes(pixels, width, height)?;
        self.reporter
            .info(&format!("Constructed a new {} x {} pixel image", width, height));
        Ok(output)
    }

    fn report_skip(&self, source: &Path, e: &SpherifyError) {
        match e {
            SpherifyError::Unrecognized { .. } => {
                self.reporter.skip(&format!("{}; skipping...", e));
            }
            SpherifyError::Unreadable { .. } => {
                self.reporter.warning(&format!("{}; skipping...", e));
            }
            _ => {
                self.reporter
                    .error(&format!("`{}`: {}; skipping...", source.display(), e));
            }
        }
    }
}
