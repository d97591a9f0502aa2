//! # 美化输出工具
//!
//! 提供统一的终端输出样式，以及每次批处理运行使用的日志接收器 `Reporter`。
//!
//! ## 依赖关系
//! - 被 `main.rs`, `commands/`, `batch/`, `sink/` 使用
//! - 使用 `colored` crate, `utils/progress.rs`

use super::progress;

use colored::Colorize;
use indicatif::ProgressBar;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

// ─────────────────────────────────────────────────────────────
// Reporter
// ─────────────────────────────────────────────────────────────

/// 单次批处理运行的日志接收器
///
/// 信息级消息只在 verbose 模式输出；警告和错误总是输出。
/// 持有一个进度条，打印时自动挂起，避免输出错位。
#[derive(Debug)]
pub struct Reporter {
    verbose: bool,
    progress: ProgressBar,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn info(&self, msg: &str) {
        if self.verbose {
            self.progress.suspend(|| print_info(msg));
        }
    }

    pub fn header(&self, title: &str) {
        if self.verbose {
            self.progress.suspend(|| print_header(title));
        }
    }

    pub fn success(&self, msg: &str) {
        if self.verbose {
            self.progress.suspend(|| print_success(msg));
        }
    }

    pub fn skip(&self, msg: &str) {
        self.progress.suspend(|| print_skip(msg));
    }

    pub fn warning(&self, msg: &str) {
        self.progress.suspend(|| print_warning(msg));
    }

    pub fn error(&self, msg: &str) {
        self.progress.suspend(|| print_error(msg));
    }

    pub fn done(&self, msg: &str) {
        self.progress.suspend(|| print_done(msg));
    }

    pub fn separator(&self) {
        self.progress.suspend(print_separator);
    }

    /// 开始显示进度（每个目标完成时调用 `advance`）
    pub fn start_progress(&self, len: u64, message: &str) {
        progress::activate(&self.progress, len, message);
    }

    pub fn advance(&self) {
        self.progress.inc(1);
    }

    pub fn finish_progress(&self) {
        self.progress.finish_and_clear();
    }
}
