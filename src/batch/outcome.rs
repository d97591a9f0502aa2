//! # 处理结果
//!
//! 单个目标的结果记录，以及整个批次的结果汇总。
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs` 生成
//! - 被 `sink/` 和 `commands/` 消费

use crate::error::SpherifyError;
use crate::imaging::LoadedImage;

use std::path::{Path, PathBuf};

/// 单个目标的处理结果
#[derive(Debug)]
pub enum Outcome {
    /// 成功重建的输出图像
    Present(LoadedImage),
    /// 跳过，附带原因
    Absent(SpherifyError),
}

/// 持久化状态
#[derive(Debug)]
pub enum Persisted {
    /// 未配置保存目录
    NotRequested,
    /// 已保存
    Saved(PathBuf),
    /// 保存失败（需要上报）
    Failed(SpherifyError),
}

/// 单个目标的结果记录
#[derive(Debug)]
pub struct OutcomeRecord {
    /// 输入文件
    pub source: PathBuf,
    pub outcome: Outcome,
    pub persisted: Persisted,
}

impl OutcomeRecord {
    pub fn present(source: PathBuf, image: LoadedImage, persisted: Persisted) -> Self {
        Self {
            source,
            outcome: Outcome::Present(image),
            persisted,
        }
    }

    pub fn absent(source: PathBuf, reason: SpherifyError) -> Self {
        Self {
            source,
            outcome: Outcome::Absent(reason),
            persisted: Persisted::NotRequested,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self.outcome, Outcome::Present(_))
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        match &self.outcome {
            Outcome::Present(image) => Some(image),
            Outcome::Absent(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&SpherifyError> {
        match &self.outcome {
            Outcome::Present(_) => None,
            Outcome::Absent(reason) => Some(reason),
        }
    }

    /// 输入文件名
    pub fn file_name(&self) -> String {
        file_name_of(&self.source)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 批处理结果统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 保存失败数量
    pub failed: usize,
}

impl BatchSummary {
    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped
    }
}

/// 批处理结果（每个候选文件一条记录，顺序与输入一致）
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<OutcomeRecord>,
}

impl BatchReport {
    pub fn new(records: Vec<OutcomeRecord>) -> Self {
        Self { records }
    }

    /// 统计结果
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for record in &self.records {
            if record.is_present() {
                summary.success += 1;
            } else {
                summary.skipped += 1;
            }
            if matches!(record.persisted, Persisted::Failed(_)) {
                summary.failed += 1;
            }
        }
        summary
    }

    /// 保存失败的记录
    pub fn write_failures(&self) -> impl Iterator<Item = (&Path, &SpherifyError)> {
        self.records.iter().filter_map(|r| match &r.persisted {
            Persisted::Failed(e) => Some((r.source.as_path(), e)),
            _ => None,
        })
    }

    /// 成功的输出图像
    pub fn images(&self) -> impl Iterator<Item = (&OutcomeRecord, &LoadedImage)> {
        self.records
            .iter()
            .filter_map(|r| r.image().map(|image| (r, image)))
    }
}
