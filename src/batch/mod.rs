//! # 批量处理模块
//!
//! 提供批量球面投影的执行引擎。
//!
//! ## 功能
//! - 展开输入目标（文件和一层目录）
//! - 每个目标独立的处理流水线
//! - 并发 / 顺序两种调度策略
//! - 结果记录与汇总
//!
//! ## 依赖关系
//! - 被 `commands/spherify.rs` 使用
//! - 使用 `engine/`, `imaging/`, `sink/`

pub mod collector;
pub mod outcome;
pub mod pipeline;
pub mod runner;

pub use runner::BatchEngine;
