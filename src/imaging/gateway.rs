//! # 图像读写
//!
//! 加载任意可识别格式并统一转换为 RGBA8，原始字节往返，按扩展名保存。
//!
//! ## 功能
//! - `load`：权限/I/O 失败 → `Unreadable`，格式无法识别 → `Unrecognized`
//! - `to_bytes` / `from_bytes`：无损原始 RGBA 字节往返
//! - `save`：按目标扩展名编码，失败 → `WriteFailed`
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs`, `sink/` 和 `imaging/viewer.rs` 使用
//! - 使用 `image` crate

use crate::engine::protocol::BYTES_PER_PIXEL;
use crate::error::{Result, SpherifyError};

use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;

/// 内存中的 RGBA8 栅格图像
///
/// 不变量：`byte_len() == width * height * 4`
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    raster: RgbaImage,
}

impl LoadedImage {
    pub fn new(raster: RgbaImage) -> Self {
        Self { raster }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// 原始字节长度
    pub fn byte_len(&self) -> usize {
        self.raster.as_raw().len()
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }
}

/// 从文件加载图像并转换为 RGBA
pub fn load(path: &Path) -> Result<LoadedImage> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| SpherifyError::Unreadable {
            path: path.display().to_string(),
            source: e,
        })?;

    let decoded = reader.decode().map_err(|e| classify_decode_error(path, e))?;

    Ok(LoadedImage::new(decoded.into_rgba8()))
}

/// 解码阶段的错误一律视为内容无法识别
///
/// 文件已经成功打开，此时的 I/O 错误（如截断文件的 `UnexpectedEof`）
/// 说明内容不完整，而不是没有读取权限。
fn classify_decode_error(path: &Path, e: ImageError) -> SpherifyError {
    let reason = match e {
        ImageError::IoError(source) => format!("truncated or corrupt data ({})", source),
        other => other.to_string(),
    };
    SpherifyError::Unrecognized {
        path: path.display().to_string(),
        reason,
    }
}

/// 导出行优先 RGBA 原始字节
pub fn to_bytes(image: &LoadedImage) -> Vec<u8> {
    image.raster().as_raw().clone()
}

/// 从给定尺寸的原始 RGBA 字节重建图像
pub fn from_bytes(bytes: Vec<u8>, width: u32, height: u32) -> Result<LoadedImage> {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    let actual = bytes.len();
    if actual != expected {
        return Err(SpherifyError::OutputSizeMismatch {
            expected,
            actual,
            width,
            height,
        });
    }

    RgbaImage::from_raw(width, height, bytes)
        .map(LoadedImage::new)
        .ok_or(SpherifyError::OutputSizeMismatch {
            expected,
            actual,
            width,
            height,
        })
}

/// 按目标扩展名保存图像
///
/// JPEG 不支持 alpha 通道，保存前先去掉。
pub fn save(image: &LoadedImage, path: &Path) -> Result<()> {
    let write_failed = |reason: String| SpherifyError::WriteFailed {
        path: path.display().to_string(),
        reason,
    };

    let format = ImageFormat::from_path(path).map_err(|e| write_failed(e.to_string()))?;

    let saved = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgba8(image.raster.clone())
            .to_rgb8()
            .save_with_format(path, format)
    } else {
        image.raster.save_with_format(path, format)
    };

    saved.map_err(|e| write_failed(e.to_string()))
}
