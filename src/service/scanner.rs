use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{ConvertError, Result};
use crate::service::traits::i_service::ScannerServiceTrait;

const HEIC_SUFFIX: &str = ".heic";

/// 目錄掃描服務
pub struct ScannerService;

impl ScannerService {
    pub fn new() -> Self {
        ScannerService
    }
}

impl Default for ScannerService {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerServiceTrait for ScannerService {
    fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        scan(dir)
    }
}

pub fn is_heic_name(name: &str) -> bool {
    name.to_lowercase().ends_with(HEIC_SUFFIX)
}

/// 列出目錄直接子項中名稱以 .heic 結尾（不分大小寫）的檔案，順序依檔案系統而定
pub fn scan(dir: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |source| ConvertError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    // walkdir 對根目錄的錯誤只在迭代時出現，先確認能列出
    fs::read_dir(dir).map_err(unreadable)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| unreadable(e.into()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if is_heic_name(&name) {
            files.push(dir.join(entry.file_name()));
        } else {
            debug!("略過非 HEIC 檔案：{}", name);
        }
    }
    Ok(files)
}
