//! # 图像网关模块
//!
//! 隔离图像解码、编码、颜色空间转换和显示，并负责失败分类。
//!
//! ## 依赖关系
//! - 被 `batch/` 和 `sink/` 模块使用
//! - 使用 `image` crate
//! - 子模块: gateway, viewer

pub mod gateway;
pub mod viewer;

pub use gateway::{from_bytes, load, save, to_bytes, LoadedImage};
pub use viewer::{SystemViewer, Viewer};
