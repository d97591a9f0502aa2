//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的进度条样式。
//!
//! ## 依赖关系
//! - 被 `utils/output.rs` 的 `Reporter` 使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// 标准进度条样式
pub fn standard_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
    )
    .unwrap()
    .progress_chars("#>-")
}

/// 将隐藏的进度条激活为标准进度条（输出到 stderr）
pub fn activate(pb: &ProgressBar, len: u64, message: &str) {
    pb.set_length(len);
    pb.set_position(0);
    pb.set_style(standard_style());
    pb.set_message(message.to_string());
    pb.set_draw_target(ProgressDrawTarget::stderr());
}
