//! # 结果输出模块
//!
//! 保存和显示处理完成的结果。
//!
//! ## 功能
//! - 按 `<前缀><原文件名>` 保存到输出目录（同名覆盖，不去重）
//! - 全部处理完成后逐个交给查看器显示
//! - CSV 报告与汇总表（子模块 report）
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs`（保存）和 `commands/spherify.rs`（显示）使用
//! - 使用 `imaging/` 模块

pub mod report;

use crate::batch::outcome::{file_name_of, BatchReport, Persisted};
use crate::config::SpherifyConfig;
use crate::imaging::{self, LoadedImage, Viewer};
use crate::utils::output::Reporter;

use std::path::{Path, PathBuf};

/// 结果接收器
pub struct ResultSink {
    /// 保存目录
    save_dir: Option<PathBuf>,
    /// 输出文件名前缀
    prefix: String,
    /// 查看器（未设置时不显示）
    viewer: Option<Box<dyn Viewer>>,
}

impl ResultSink {
    pub fn new(save_dir: Option<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            save_dir,
            prefix: prefix.into(),
            viewer: None,
        }
    }

    /// 根据批次配置创建（显示开关由调用方决定是否附加查看器）
    pub fn from_config(config: &SpherifyConfig) -> Self {
        Self::new(config.save_dir.clone(), config.prefix.clone())
    }

    /// 附加查看器
    pub fn with_viewer(mut self, viewer: Box<dyn Viewer>) -> Self {
        self.viewer = Some(viewer);
        self
    }

    /// 输出路径：`<save_dir>/<prefix><原文件名>`
    pub fn output_path(&self, source: &Path) -> Option<PathBuf> {
        self.save_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}{}", self.prefix, file_name_of(source))))
    }

    /// 保存单个结果
    pub fn persist(&self, image: &LoadedImage, source: &Path, reporter: &Reporter) -> Persisted {
        let out = match self.output_path(source) {
            Some(p) => p,
            None => return Persisted::NotRequested,
        };

        reporter.info(&format!("Saving image to `{}`...", out.display()));
        match imaging::save(image, &out) {
            Ok(()) => {
                reporter.success(&format!("Image saved successfully to `{}`", out.display()));
                Persisted::Saved(out)
            }
            Err(e) => {
                reporter.error(&e.to_string());
                Persisted::Failed(e)
            }
        }
    }

    /// 显示所有成功的结果，返回成功交给查看器的数量
    ///
    /// 查看器失败只记录警告，不影响批处理结果。
    pub fn display_all(&self, report: &BatchReport, reporter: &Reporter) -> usize {
        let viewer = match self.viewer {
            Some(ref v) => v,
            None => return 0,
        };

        let mut shown = 0;
        for (record, image) in report.images() {
            match viewer.show(image, &record.file_name()) {
                Ok(()) => shown += 1,
                Err(e) => reporter.warning(&format!(
                    "Could not display result for `{}`: {}",
                    record.source.display(),
                    e
                )),
            }
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::outcome::OutcomeRecord;
    use crate::error::{Result, SpherifyError};

    use image::{Rgba, RgbaImage};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 记录被显示的文件名
    struct RecordingViewer {
        shown: Rc<RefCell<Vec<String>>>,
    }

    impl Viewer for RecordingViewer {
        fn show(&self, _image: &LoadedImage, name: &str) -> Result<()> {
            self.shown.borrow_mut().push(name.to_string());
            Ok(())
        }
    }

    fn pixel_image() -> LoadedImage {
        LoadedImage::new(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn test_output_path_uses_prefix() {
        let sink = ResultSink::new(Some(PathBuf::from("/out")), "sph_");
        assert_eq!(
            sink.output_path(Path::new("/in/cat.png")),
            Some(PathBuf::from("/out/sph_cat.png"))
        );
        assert_eq!(ResultSink::new(None, "sph_").output_path(Path::new("a.png")), None);
    }

    #[test]
    fn test_persist_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::new(Some(dir.path().to_path_buf()), "p_");
        let reporter = Reporter::new(false);

        match sink.persist(&pixel_image(), Path::new("in/a.png"), &reporter) {
            Persisted::Saved(path) => {
                assert_eq!(path, dir.path().join("p_a.png"));
                assert_eq!(imaging::load(&path).unwrap(), pixel_image());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::new(Some(dir.path().join("does-not-exist")), "p_");

        let persisted = sink.persist(&pixel_image(), Path::new("a.png"), &Reporter::new(false));
        assert!(matches!(
            persisted,
            Persisted::Failed(SpherifyError::WriteFailed { .. })
        ));
    }

    #[test]
    fn test_display_only_present_images() {
        let shown = Rc::new(RefCell::new(Vec::new()));
        let sink = ResultSink::new(None, "sph_").with_viewer(Box::new(RecordingViewer {
            shown: Rc::clone(&shown),
        }));
        let report = BatchReport::new(vec![
            OutcomeRecord::present(PathBuf::from("a.png"), pixel_image(), Persisted::NotRequested),
            OutcomeRecord::absent(PathBuf::from("b.png"), SpherifyError::Other("x".into())),
            OutcomeRecord::present(PathBuf::from("c.png"), pixel_image(), Persisted::NotRequested),
        ]);

        assert_eq!(sink.display_all(&report, &Reporter::new(false)), 2);
        assert_eq!(*shown.borrow(), vec!["a.png", "c.png"]);
    }
}
