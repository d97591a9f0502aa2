//! # 外部引擎模块
//!
//! 封装与外部数值引擎（Julia 程序）的二进制协议和子进程交换。
//!
//! ## 功能
//! - 命令行参数协议（位置参数，顺序固定）
//! - stdin/stdout 原始 RGBA 字节交换
//! - 阻塞模式与协作式并发模式两种进程交换实现
//!
//! ## 依赖关系
//! - 被 `batch/` 模块使用
//! - 子模块: protocol, runner

pub mod protocol;
pub mod runner;

pub use protocol::{EngineCommand, EngineInvocation, SphereParams};
pub use runner::{AsyncExchange, BlockingExchange, ProcessExchange};
