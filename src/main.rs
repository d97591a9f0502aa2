//! # Spherify - 批量球面投影工具
//!
//! 把一批图像交给外部数值引擎投影到 2-球面并拍摄快照，
//! 再把结果重建、保存和/或显示。
//!
//! ## 执行模式
//! - 并发（默认）：所有图像同时处理，单线程协作式调度
//! - 顺序（`--consecutive`）：逐个处理，限制内存峰值
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     └── batch/     (批量执行引擎)
//!   │           ├── engine/  (外部引擎协议与子进程交换)
//!   │           ├── imaging/ (图像读写与显示)
//!   │           └── sink/    (结果保存、显示与报告)
//!   ├── config.rs   (批次配置)
//!   ├── utils/      (输出、进度条、交互确认)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod engine;
mod error;
mod imaging;
mod sink;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
