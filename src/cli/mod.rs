//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 参数传递给 `commands/spherify.rs`

use clap::Parser;
use std::path::PathBuf;

/// 球心坐标维度
pub const DIMENSIONS: usize = 3;

/// Spherify - 批量球面投影工具
#[derive(Parser, Debug)]
#[command(name = "spherify")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Project images onto a 2-sphere and snapshot the result.", long_about = None)]
pub struct Cli {
    /// Paths to image files or directories of images to use for input
    #[arg(required = true, value_name = "IMAGE_PATH")]
    pub paths: Vec<PathBuf>,

    /// Only expand directory entries matching these glob patterns (comma-separated)
    #[arg(long, default_value = "*")]
    pub pattern: String,

    // ─────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────
    /// Save the resulting image(s) into this directory (created if missing).
    /// If omitted, the results are not saved, but simply displayed on screen
    #[arg(short = 'd', long)]
    pub save_directory: Option<PathBuf>,

    /// Prefix added to the input file's name to make the name of the output file
    #[arg(short = 'f', long, default_value = "sph_")]
    pub output_file_prefix: String,

    /// Do not display the resulting images on screen at the end
    #[arg(short = 'D', long, default_value_t = false)]
    pub no_display: bool,

    /// Image viewer command to use instead of the platform default.
    /// Each result is handed over as a PNG in the system temporary directory;
    /// those files are left in place for the viewer and are not cleaned up
    #[arg(long)]
    pub viewer: Option<String>,

    /// Write a CSV summary of all outcomes to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────
    // Sphere / snapshot parameters
    // ─────────────────────────────────────────────────────────────
    /// Center of the 2-sphere as three comma-separated numbers, e.g. `0.8,-1,420.69`
    #[arg(
        short = 'c',
        long,
        default_value = "0,0,0",
        value_parser = parse_center_point,
        allow_hyphen_values = true
    )]
    pub center_point: [f64; DIMENSIONS],

    /// Radius of the 2-sphere
    #[arg(short = 'r', long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub radius: f64,

    /// Number of samples per pixel
    #[arg(short = 's', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub sampling_density: u32,

    /// Width of the desired snapshot in pixels
    #[arg(short = 'W', long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub snapshot_width: u32,

    /// Height of the desired snapshot in pixels
    #[arg(short = 'H', long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub snapshot_height: u32,

    /// Reconstruct results with the source image size instead of the snapshot size
    #[arg(long, default_value_t = false)]
    pub legacy_output_size: bool,

    // ─────────────────────────────────────────────────────────────
    // External engine
    // ─────────────────────────────────────────────────────────────
    /// Julia executable/command in the current environment or path to the Julia binary
    #[arg(short = 'J', long, env = "SPHERIFY_JULIA", default_value = "julia")]
    pub julia_binary: String,

    /// Engine entry script (defaults to `spherify.jl` next to this executable)
    #[arg(long, env = "SPHERIFY_SCRIPT")]
    pub engine_script: Option<PathBuf>,

    /// Treat a non-zero engine exit status as a failure even without stderr output
    #[arg(long, default_value_t = false)]
    pub strict_exit: bool,

    // ─────────────────────────────────────────────────────────────
    // Execution control
    // ─────────────────────────────────────────────────────────────
    /// Run in consecutive mode, i.e. one image after another without concurrency.
    /// Concurrent mode keeps all input and output images in memory at the same time
    #[arg(short = 'C', long, default_value_t = false)]
    pub consecutive: bool,

    /// Produce informative output during the run
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,

    /// Measure and print the total execution time at the very end
    #[arg(short = 'T', long, default_value_t = false)]
    pub get_exec_time: bool,

    /// Do not ask for confirmation when results are neither displayed nor saved
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,
}

/// 解析球心坐标（逗号分隔的三个浮点数，不含空格）
pub fn parse_center_point(input: &str) -> Result<[f64; DIMENSIONS], String> {
    let coords = input
        .split(',')
        .map(|c| {
            c.parse::<f64>()
                .map_err(|_| format!("Invalid coordinate '{}' in center point '{}'", c, input))
        })
        .collect::<Result<Vec<_>, _>>()?;

    coords.try_into().map_err(|v: Vec<f64>| {
        format!(
            "Center point must have exactly {} coordinates, got {}",
            DIMENSIONS,
            v.len()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_center_point() {
        assert_eq!(parse_center_point("0,0,0").unwrap(), [0.0, 0.0, 0.0]);
        assert_eq!(
            parse_center_point("0.8,-1,420.69").unwrap(),
            [0.8, -1.0, 420.69]
        );
        assert!(parse_center_point("1,2").is_err());
        assert!(parse_center_point("1,2,3,4").is_err());
        assert!(parse_center_point("1, 2,3").is_err());
        assert!(parse_center_point("a,b,c").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["spherify", "a.png"]).unwrap();
        assert_eq!(cli.paths, vec![PathBuf::from("a.png")]);
        assert_eq!(cli.output_file_prefix, "sph_");
        assert_eq!(cli.center_point, [0.0, 0.0, 0.0]);
        assert_eq!(cli.radius, 1.0);
        assert_eq!(cli.sampling_density, 1);
        assert_eq!((cli.snapshot_width, cli.snapshot_height), (500, 500));
        assert!(!cli.consecutive);
        assert!(!cli.no_display);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::try_parse_from([
            "spherify", "-c", "-1,2.5,3", "-r", "2", "-s", "4", "-W", "64", "-H", "32", "-C",
            "-D", "-d", "out", "-f", "x_", "-v", "a.png", "dir",
        ])
        .unwrap();
        assert_eq!(cli.center_point, [-1.0, 2.5, 3.0]);
        assert_eq!(cli.radius, 2.0);
        assert_eq!(cli.sampling_density, 4);
        assert_eq!((cli.snapshot_width, cli.snapshot_height), (64, 32));
        assert!(cli.consecutive && cli.no_display && cli.verbose);
        assert_eq!(cli.save_directory, Some(PathBuf::from("out")));
        assert_eq!(cli.output_file_prefix, "x_");
        assert_eq!(cli.paths.len(), 2);
    }

    #[test]
    fn test_cli_rejects_zero_density() {
        assert!(Cli::try_parse_from(["spherify", "-s", "0", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["spherify", "-W", "0", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["spherify"]).is_err());
    }
}
