//! # 批处理报告
//!
//! 汇总表（终端）和 CSV 报告（文件）。
//!
//! ## 依赖关系
//! - 被 `commands/spherify.rs` 调用
//! - 使用 `tabled`, `csv`, `serde`

use crate::batch::outcome::{BatchReport, OutcomeRecord, Persisted};
use crate::error::{Result, SpherifyError};

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 报告中的一行
#[derive(Debug, Serialize, Tabled, PartialEq)]
pub struct ReportRow {
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
    #[tabled(rename = "Output")]
    pub output: String,
}

impl From<&OutcomeRecord> for ReportRow {
    fn from(record: &OutcomeRecord) -> Self {
        let (status, detail) = match (record.reason(), record.image(), &record.persisted) {
            (Some(reason), _, _) => (reason.kind().to_string(), one_line(reason)),
            (None, _, Persisted::Failed(e)) => ("save-failed".to_string(), one_line(e)),
            (None, Some(image), _) => (
                "ok".to_string(),
                format!("{} x {}", image.width(), image.height()),
            ),
            (None, None, _) => ("unknown".to_string(), String::new()),
        };

        let output = match &record.persisted {
            Persisted::Saved(path) => path.display().to_string(),
            _ => String::new(),
        };

        ReportRow {
            source: record.source.display().to_string(),
            status,
            detail,
            output,
        }
    }
}

/// 错误信息压缩为单行
fn one_line(e: &SpherifyError) -> String {
    e.to_string().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 生成所有报告行
pub fn rows(report: &BatchReport) -> Vec<ReportRow> {
    report.records.iter().map(ReportRow::from).collect()
}

/// 打印汇总表
pub fn print_table(report: &BatchReport) {
    let rows = rows(report);
    if !rows.is_empty() {
        println!("{}", Table::new(&rows));
    }
}

/// 保存 CSV 报告
pub fn write_csv(report: &BatchReport, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for row in rows(report) {
        wtr.serialize(row)?;
    }

    wtr.flush().map_err(|e| SpherifyError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::LoadedImage;

    use image::RgbaImage;
    use std::path::PathBuf;

    fn sample_report() -> BatchReport {
        BatchReport::new(vec![
            OutcomeRecord::present(
                PathBuf::from("a.png"),
                LoadedImage::new(RgbaImage::new(8, 4)),
                Persisted::Saved(PathBuf::from("out/sph_a.png")),
            ),
            OutcomeRecord::absent(
                PathBuf::from("b.png"),
                SpherifyError::EngineStderr {
                    stderr: "ERROR: LoadError\nstacktrace".to_string(),
                },
            ),
        ])
    }

    #[test]
    fn test_rows() {
        let rows = rows(&sample_report());
        assert_eq!(
            rows[0],
            ReportRow {
                source: "a.png".to_string(),
                status: "ok".to_string(),
                detail: "8 x 4".to_string(),
                output: "out/sph_a.png".to_string(),
            }
        );
        assert_eq!(rows[1].status, "engine-stderr");
        assert_eq!(
            rows[1].detail,
            "External engine exited with an error: ERROR: LoadError stacktrace"
        );
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_csv(&sample_report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("source,status,detail,output"));
        assert_eq!(lines.next(), Some("a.png,ok,8 x 4,out/sph_a.png"));
        assert!(lines.next().unwrap().starts_with("b.png,engine-stderr,"));
    }
}
