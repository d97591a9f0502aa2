//! # 统一错误处理模块
//!
//! 定义 Spherify 的所有错误类型，使用 `thiserror` 派生。
//!
//! 单个输入文件的失败（读取、识别、外部引擎）在批处理边界被吸收，
//! 作为缺失结果的原因保存在 `OutcomeRecord` 中；只有配置层面的问题
//! 和未预期的 I/O 错误会直接向上传播。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Spherify 统一错误类型
#[derive(Error, Debug)]
pub enum SpherifyError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 图像读写错误
    // ─────────────────────────────────────────────────────────────
    #[error("Cannot read image '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not identify image '{path}': {reason}")]
    Unrecognized { path: String, reason: String },

    #[error("Failed to save image to '{path}': {reason}")]
    WriteFailed { path: String, reason: String },

    #[error(
        "Engine returned {actual} bytes, expected {expected} for a {width} x {height} RGBA image"
    )]
    OutputSizeMismatch {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },

    // ─────────────────────────────────────────────────────────────
    // 外部引擎错误
    // ─────────────────────────────────────────────────────────────
    #[error("External engine '{command}' not found")]
    EngineNotFound { command: String },

    #[error("Failed to launch external engine '{command}'")]
    EngineLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while talking to external engine '{command}'")]
    EngineIo {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch image viewer '{command}'")]
    ViewerLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("External engine exited with an error:\n{stderr}")]
    EngineStderr { stderr: String },

    #[error("External engine exited with status {status}:\n{stderr}")]
    EngineExit { status: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Aborted by user")]
    Aborted,

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl SpherifyError {
    /// 简短的分类标签（用于汇总表和 CSV 报告）
    pub fn kind(&self) -> &'static str {
        match self {
            SpherifyError::Unreadable { .. } => "unreadable",
            SpherifyError::Unrecognized { .. } => "unrecognized",
            SpherifyError::WriteFailed { .. } => "write-failed",
            SpherifyError::OutputSizeMismatch { .. } => "size-mismatch",
            SpherifyError::EngineNotFound { .. } => "engine-not-found",
            SpherifyError::EngineLaunch { .. } => "engine-launch",
            SpherifyError::EngineIo { .. } => "engine-io",
            SpherifyError::EngineStderr { .. } => "engine-stderr",
            SpherifyError::EngineExit { .. } => "engine-exit",
            _ => "error",
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SpherifyError>;
