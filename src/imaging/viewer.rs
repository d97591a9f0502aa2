//! # 图像显示
//!
//! 将结果交给平台图像查看器，单向触发，不等待查看器退出。
//!
//! 每个结果写成系统临时目录下唯一命名的 PNG（`spherify_<原文件名>_XXXXXX.png`），
//! 查看器可能在本程序退出后才读取，所以这些文件不会被删除。
//!
//! ## 依赖关系
//! - 被 `sink/` 使用
//! - 使用 `imaging/gateway.rs` 写出临时 PNG

use super::gateway::{self, LoadedImage};
use crate::error::{Result, SpherifyError};

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::Builder;

/// 图像显示能力
pub trait Viewer {
    /// 显示图像；`name` 为原始输入文件名
    fn show(&self, image: &LoadedImage, name: &str) -> Result<()>;
}

/// 系统默认查看器
#[derive(Debug, Clone, Default)]
pub struct SystemViewer {
    /// 自定义查看器命令（覆盖平台默认）
    command: Option<String>,
}

impl SystemViewer {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    /// 把图像写入唯一命名的临时 PNG，返回其路径
    ///
    /// 同名输入（如 `a/x.png` 与 `b/x.png`）各自得到独立的文件。
    fn stage(image: &LoadedImage, name: &str) -> Result<PathBuf> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");

        let staging_failed = |e: std::io::Error| SpherifyError::FileWriteError {
            path: std::env::temp_dir().display().to_string(),
            source: e,
        };
        let file = Builder::new()
            .prefix(&format!("spherify_{}_", stem))
            .suffix(".png")
            .tempfile()
            .map_err(staging_failed)?;
        let (_, path) = file.keep().map_err(|e| staging_failed(e.error))?;

        gateway::save(image, &path)?;
        Ok(path)
    }

    fn opener(&self) -> Command {
        if let Some(ref cmd) = self.command {
            return Command::new(cmd);
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("open")
        }
        #[cfg(windows)]
        {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        }
        #[cfg(not(any(target_os = "macos", windows)))]
        {
            Command::new("xdg-open")
        }
    }
}

impl Viewer for SystemViewer {
    fn show(&self, image: &LoadedImage, name: &str) -> Result<()> {
        let path = Self::stage(image, name)?;

        let mut cmd = self.opener();
        cmd.arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // 不等待查看器退出
        cmd.spawn().map(|_| ()).map_err(|e| SpherifyError::ViewerLaunch {
            command: cmd.get_program().to_string_lossy().into_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(shade: u8) -> LoadedImage {
        LoadedImage::new(RgbaImage::from_pixel(2, 2, Rgba([shade, 0, 0, 255])))
    }

    #[test]
    fn test_stage_uses_stem() {
        let path = SystemViewer::stage(&solid(1), "holiday.jpg").unwrap();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("spherify_holiday_"));
        assert!(name.ends_with(".png"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_same_stem_gets_separate_files() {
        let red = solid(255);
        let blue = solid(7);

        let first = SystemViewer::stage(&red, "photo.png").unwrap();
        let second = SystemViewer::stage(&blue, "photo.jpg").unwrap();

        assert_ne!(first, second);
        assert_eq!(gateway::load(&first).unwrap(), red);
        assert_eq!(gateway::load(&second).unwrap(), blue);

        std::fs::remove_file(first).unwrap();
        std::fs::remove_file(second).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_custom_viewer_is_spawned() {
        let viewer = SystemViewer::new(Some("true".to_string()));
        viewer.show(&solid(3), "custom_viewer_test.png").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_viewer_reports_launch_error() {
        let viewer = SystemViewer::new(Some("spherify-no-such-viewer".to_string()));
        assert!(matches!(
            viewer.show(&solid(3), "x.png"),
            Err(SpherifyError::ViewerLaunch { .. })
        ));
    }
}
