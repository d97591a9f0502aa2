//! # 引擎协议
//!
//! 定义与外部计算进程之间的调用约定，与进程如何启动无关。
//!
//! ## 协议
//! ```text
//! <binary> <script> <w>,<h> <cx>,<cy>,<cz> <radius> <density> <snap_w>,<snap_h>
//! stdin : w*h*4 字节，行优先 RGBA
//! stdout: 输出图像的行优先 RGBA 字节
//! stderr: 任何非空内容都视为该图像失败
//! ```
//!
//! ## 依赖关系
//! - 被 `engine/runner.rs` 和 `batch/pipeline.rs` 使用

use crate::error::{Result, SpherifyError};

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitStatus, Output};

/// 每个像素的字节数（RGBA）
pub const BYTES_PER_PIXEL: usize = 4;

/// 球面投影参数（批次级配置，按值复制到每次调用）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereParams {
    /// 球心坐标
    pub center: [f64; 3],
    /// 球半径
    pub radius: f64,
    /// 每像素采样数
    pub sampling_density: u32,
    /// 快照宽度（像素）
    pub snapshot_width: u32,
    /// 快照高度（像素）
    pub snapshot_height: u32,
}

impl Default for SphereParams {
    fn default() -> Self {
        SphereParams {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
            sampling_density: 1,
            snapshot_width: 500,
            snapshot_height: 500,
        }
    }
}

/// 外部引擎的可执行文件与入口脚本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    /// 可执行文件名称或路径（如 `julia`）
    pub binary: String,
    /// 入口脚本路径
    pub script: PathBuf,
}

impl EngineCommand {
    pub fn new(binary: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            script: script.into(),
        }
    }
}

/// 单次子进程调用的不可变参数集
///
/// 宽高随每张图像变化，其余字段来自批次配置。
#[derive(Debug, Clone, PartialEq)]
pub struct EngineInvocation {
    pub command: EngineCommand,
    pub params: SphereParams,
    pub width: u32,
    pub height: u32,
}

impl EngineInvocation {
    /// 按已加载图像的实际尺寸构造调用参数
    pub fn new(command: &EngineCommand, params: SphereParams, width: u32, height: u32) -> Self {
        Self {
            command: command.clone(),
            params,
            width,
            height,
        }
    }

    /// 可执行文件
    pub fn program(&self) -> &str {
        &self.command.binary
    }

    /// 位置参数列表（脚本路径在首位）
    pub fn args(&self) -> Vec<OsString> {
        let p = &self.params;
        let mut args = vec![self.command.script.clone().into_os_string()];
        args.extend(
            [
                format!("{},{}", self.width, self.height),
                p.center
                    .iter()
                    .map(|c| format_float(*c))
                    .collect::<Vec<_>>()
                    .join(","),
                format_float(p.radius),
                p.sampling_density.to_string(),
                format!("{},{}", p.snapshot_width, p.snapshot_height),
            ]
            .into_iter()
            .map(OsString::from),
        );
        args
    }

    /// stdin 应写入的字节数
    pub fn expected_input_len(&self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    /// 完整命令行（仅用于日志）
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.command.binary.clone()];
        parts.extend(self.args().iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// 浮点数格式化：始终保留小数部分（`1` -> `1.0`）
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// 外部引擎的原始输出
#[derive(Debug, Clone)]
pub struct EngineResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: ExitStatus,
}

impl From<Output> for EngineResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status,
        }
    }
}

impl EngineResult {
    /// stderr 文本（有损 UTF-8 解码）
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim_end().to_string()
    }

    /// 校验输出并取出像素字节
    ///
    /// 非空 stderr 无论退出码如何都视为失败；`strict` 时非零退出码同样失败。
    pub fn into_pixels(self, strict: bool) -> Result<Vec<u8>> {
        if !self.stderr.is_empty() {
            return Err(SpherifyError::EngineStderr {
                stderr: self.stderr_text(),
            });
        }
        if strict && !self.status.success() {
            return Err(SpherifyError::EngineExit {
                status: self.status.to_string(),
                stderr: self.stderr_text(),
            });
        }
        Ok(self.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation() -> EngineInvocation {
        let command = EngineCommand::new("julia", "/opt/spherify/spherify.jl");
        let params = SphereParams {
            center: [0.8, -1.0, 420.69],
            radius: 2.5,
            sampling_density: 4,
            snapshot_width: 640,
            snapshot_height: 480,
        };
        EngineInvocation::new(&command, params, 120, 80)
    }

    #[test]
    fn test_args_order() {
        let args: Vec<String> = invocation()
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "/opt/spherify/spherify.jl",
                "120,80",
                "0.8,-1.0,420.69",
                "2.5",
                "4",
                "640,480",
            ]
        );
    }

    #[test]
    fn test_default_params_format() {
        let command = EngineCommand::new("julia", "s.jl");
        let inv = EngineInvocation::new(&command, SphereParams::default(), 3, 2);
        assert_eq!(inv.command_line(), "julia s.jl 3,2 0.0,0.0,0.0 1.0 1 500,500");
        assert_eq!(inv.expected_input_len(), 24);
    }

    #[cfg(unix)]
    fn status(code: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_is_authoritative() {
        let result = EngineResult {
            stdout: vec![1, 2, 3, 4],
            stderr: b"ERROR: boom\n".to_vec(),
            status: status(0),
        };
        match result.into_pixels(false) {
            Err(SpherifyError::EngineStderr { stderr }) => assert_eq!(stderr, "ERROR: boom"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_only_checked_when_strict() {
        let result = EngineResult {
            stdout: vec![0; 4],
            stderr: Vec::new(),
            status: status(3),
        };
        assert_eq!(result.clone().into_pixels(false).unwrap(), vec![0; 4]);
        assert!(matches!(
            result.into_pixels(true),
            Err(SpherifyError::EngineExit { .. })
        ));
    }
}
