use clap::{Parser, ValueEnum};
use std::path::Path;

use crate::error::{ConvertError, Result};

#[derive(Parser, Clone, Debug)]
#[command(
    name = "heic_to_jpg",
    about = "將目錄中的 HEIC 圖片批次轉換為 JPEG",
    long_about = "掃描來源目錄（不遞迴）中副檔名為 .heic 的檔案（不分大小寫），以多執行緒平行轉換為 JPEG 並寫入輸出目錄。\n不帶任何參數執行時進入互動模式。\n使用 `--help` 查看詳細用法。",
    arg_required_else_help = true
)]
pub struct Cli {
    pub input: String,
    #[arg(short, long, default_value = "output")]
    pub output: String,
    #[arg(long, value_enum, default_value = "bounded")]
    pub policy: DispatchPolicy,
    #[arg(short, long)]
    pub jobs: Option<usize>,
    #[arg(long = "on-collision", value_enum, default_value = "report")]
    pub collision: CollisionPolicy,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "info", value_parser = ["info", "warn", "error", "debug"])]
    pub log_level: String,
}

/// 工作分派策略
#[derive(Clone, Copy, ValueEnum, PartialEq, Eq, Debug, Default)]
pub enum DispatchPolicy {
    /// 固定大小的執行緒池
    #[default]
    Bounded,
    /// 每個檔案一個執行緒，無上限
    Unbounded,
}

/// 多個來源檔案對應到同一個輸出檔名時的處理方式
#[derive(Clone, Copy, ValueEnum, PartialEq, Eq, Debug, Default)]
pub enum CollisionPolicy {
    #[default]
    Report,
    Overwrite,
    Suffix,
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

pub fn validate_source_dir(input: &str) -> Result<&Path> {
    let path = Path::new(input);
    if !path.is_dir() {
        log::error!("來源目錄不存在或不是目錄：{}", input);
        return Err(ConvertError::DirectoryUnreadable {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("'{}' 不是可讀取的目錄", input),
            ),
        });
    }
    Ok(path)
}

pub fn validate_destination(output: &str) -> Result<()> {
    if output.trim().is_empty() {
        return Err(ConvertError::InvalidConfig("輸出目錄不可為空".to_string()));
    }
    Ok(())
}

pub fn validate_jobs(jobs: Option<usize>) -> Result<usize> {
    match jobs {
        Some(0) => Err(ConvertError::InvalidConfig(
            "--jobs 必須至少為 1".to_string(),
        )),
        Some(n) => Ok(n),
        None => Ok(default_jobs()),
    }
}
