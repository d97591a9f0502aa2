//! # 子进程交换
//!
//! 启动外部引擎，把像素字节写入其 stdin，同时收集 stdout/stderr。
//!
//! ## 功能
//! - `ProcessExchange` trait：批处理流水线唯一依赖的交换能力
//! - `BlockingExchange`：标准库阻塞子进程，写入在独立线程中进行
//! - `AsyncExchange`：基于 tokio 的非阻塞子进程，可在单线程调度器上并发
//!
//! 两种实现都同时进行写入与读取，避免大负载时管道缓冲区互相阻塞。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 选择、被 `batch/pipeline.rs` 调用
//! - 使用 `tokio::process`, `async-trait`

use super::protocol::{EngineInvocation, EngineResult};
use crate::error::{Result, SpherifyError};

use async_trait::async_trait;
use std::io::{self, Write};
use std::process::Stdio;

/// 一次完整的 "写入 stdin → 等待结束 → 返回输出" 交换
#[async_trait]
pub trait ProcessExchange: Send + Sync {
    /// 执行交换；仅启动失败和管道 I/O 失败返回错误，stderr 内容由调用方判断
    async fn invoke(&self, invocation: &EngineInvocation, input: Vec<u8>) -> Result<EngineResult>;

    /// 模式名称（用于日志）
    fn mode(&self) -> &'static str;
}

// ─────────────────────────────────────────────────────────────
// 阻塞模式
// ─────────────────────────────────────────────────────────────

/// 阻塞式进程交换（顺序模式）
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingExchange;

#[async_trait]
impl ProcessExchange for BlockingExchange {
    async fn invoke(&self, invocation: &EngineInvocation, input: Vec<u8>) -> Result<EngineResult> {
        run_blocking(invocation, input)
    }

    fn mode(&self) -> &'static str {
        "blocking"
    }
}

fn run_blocking(invocation: &EngineInvocation, input: Vec<u8>) -> Result<EngineResult> {
    let program = invocation.program();

    let mut child = std::process::Command::new(program)
        .args(invocation.args())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(program, e))?;

    let mut stdin = child.stdin.take().ok_or_else(|| missing_pipe(program))?;

    // stdin 在独立线程写入，主线程同时读取 stdout/stderr
    let writer = std::thread::spawn(move || {
        let written = stdin.write_all(&input);
        drop(stdin);
        written
    });

    let output = child.wait_with_output().map_err(|e| SpherifyError::EngineIo {
        command: program.to_string(),
        source: e,
    })?;

    let written = writer
        .join()
        .map_err(|_| SpherifyError::Other("stdin writer thread panicked".to_string()))?;
    check_written(program, written)?;

    Ok(EngineResult::from(output))
}

// ─────────────────────────────────────────────────────────────
// 协作式并发模式
// ─────────────────────────────────────────────────────────────

/// 非阻塞进程交换（并发模式）
///
/// spawn、写入 stdin、等待输出都是挂起点，多个调用可以在同一线程上交错。
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncExchange;

#[async_trait]
impl ProcessExchange for AsyncExchange {
    async fn invoke(&self, invocation: &EngineInvocation, input: Vec<u8>) -> Result<EngineResult> {
        use tokio::io::AsyncWriteExt;

        let program = invocation.program();

        let mut child = tokio::process::Command::new(program)
            .args(invocation.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(program, e))?;

        let mut stdin = child.stdin.take().ok_or_else(|| missing_pipe(program))?;

        let feed = async move {
            let written = stdin.write_all(&input).await;
            drop(stdin);
            written
        };

        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| SpherifyError::EngineIo {
            command: program.to_string(),
            source: e,
        })?;
        check_written(program, written)?;

        Ok(EngineResult::from(output))
    }

    fn mode(&self) -> &'static str {
        "concurrent"
    }
}

// ─────────────────────────────────────────────────────────────
// 错误分类
// ─────────────────────────────────────────────────────────────

fn spawn_error(program: &str, e: io::Error) -> SpherifyError {
    if e.kind() == io::ErrorKind::NotFound {
        SpherifyError::EngineNotFound {
            command: program.to_string(),
        }
    } else {
        SpherifyError::EngineLaunch {
            command: program.to_string(),
            source: e,
        }
    }
}

fn missing_pipe(program: &str) -> SpherifyError {
    SpherifyError::EngineIo {
        command: program.to_string(),
        source: io::Error::new(io::ErrorKind::BrokenPipe, "stdin was not captured"),
    }
}

/// 引擎提前关闭 stdin 时（BrokenPipe）不算错误，由 stderr 决定成败
fn check_written(program: &str, written: io::Result<()>) -> Result<()> {
    match written {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(SpherifyError::EngineIo {
            command: program.to_string(),
            source: e,
        }),
        _ => Ok(()),
    }
}
