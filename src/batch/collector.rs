//! # 文件收集器
//!
//! 把输入目标展开为有序的候选文件列表。
//!
//! ## 功能
//! - 文件直接作为候选（存在性检查推迟到加载阶段）
//! - 目录只展开一层，子目录静默跳过
//! - 目录条目按文件名排序，可用 glob 模式过滤
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{Result, SpherifyError};
use crate::utils::output::Reporter;

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入目标
    inputs: Vec<PathBuf>,
    /// 目录展开时的匹配模式列表
    patterns: Vec<Pattern>,
}

impl FileCollector {
    /// 创建新的文件收集器（默认匹配所有文件）
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            patterns: Vec::new(),
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "*")
            .map(|s| {
                Pattern::new(s).map_err(|e| {
                    SpherifyError::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// 收集所有候选文件，保持输入顺序
    pub fn collect(&self, reporter: &Reporter) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for input in &self.inputs {
            if input.is_dir() {
                let before = files.len();
                self.expand_dir(input, &mut files, reporter);
                reporter.info(&format!(
                    "Directory `{}` expanded to {} file(s)",
                    input.display(),
                    files.len() - before
                ));
            } else {
                files.push(input.clone());
            }
        }

        files
    }

    /// 展开一层目录
    fn expand_dir(&self, dir: &Path, files: &mut Vec<PathBuf>, reporter: &Reporter) {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    reporter.warning(&format!("Cannot read entry in `{}`: {}", dir.display(), e));
                    continue;
                }
            };

            // 子目录静默跳过，避免未知的递归深度
            if entry.file_type().is_dir() {
                continue;
            }

            if self.matches_patterns(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    /// 检查文件是否匹配任一模式
    fn matches_patterns(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return true;
        }

        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        self.patterns.iter().any(|p| p.matches(filename))
    }
}
