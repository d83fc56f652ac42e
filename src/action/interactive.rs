use dialoguer::{Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::config::{default_jobs, CollisionPolicy, DispatchPolicy};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::error::{ConvertError, Result};
use crate::facade::conversion_facade::ConversionAdapter;
use crate::models::conversion::ConversionOutput;
use crate::service::config_service::ConfigService;
use crate::utils::utils::setup_logging;

pub fn process_interactive_mode() -> Result<ConversionOutput> {
    println!("=== HEIC 轉 JPEG 互動模式 ===");
    setup_logging("info");

    let config_service = ConfigService::new(Box::new(InteractiveConfigAdapter::new(".")));
    let config = config_service.get_config()?;
    ConversionAdapter.execute(config)
}

/// 列出目錄下的子目錄作為來源候選，依名稱排序
pub fn list_candidate_directories(base: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(base).map_err(|source| ConvertError::DirectoryUnreadable {
        path: base.to_path_buf(),
        source,
    })?;
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

pub fn select_source_directory(candidates: &[PathBuf]) -> Result<PathBuf> {
    if candidates.is_empty() {
        return Err(ConvertError::InvalidConfig(
            "目前目錄下沒有可選擇的子目錄".to_string(),
        ));
    }
    let items: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(i, dir)| {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| dir.display().to_string());
            format!("{}. {}", i + 1, name)
        })
        .collect();
    let choice = Select::new()
        .with_prompt("選擇包含 HEIC 檔案的目錄（使用方向鍵選擇，按 Enter 確認）")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(candidates[choice].clone())
}

pub fn read_destination_path() -> Result<String> {
    let output: String = Input::new()
        .with_prompt("輸入輸出目錄（可自由輸入路徑，預設為 output）")
        .default("output".to_string())
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if input.trim().is_empty() {
                Err("輸出目錄不可為空".to_string())
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(output.trim().to_string())
}

// 互動配置適配器
pub struct InteractiveConfigAdapter {
    base: PathBuf,
}

impl InteractiveConfigAdapter {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        InteractiveConfigAdapter { base: base.into() }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        let candidates = list_candidate_directories(&self.base)?;
        let source_dir = select_source_directory(&candidates)?;
        let destination = read_destination_path()?;

        Ok(AppConfig {
            source_dir,
            destination_dir: PathBuf::from(destination),
            policy: DispatchPolicy::Bounded,
            jobs: default_jobs(),
            collision: CollisionPolicy::Report,
            no_progress: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_candidate_directories_only_dirs_sorted() {
        let base = tempdir().unwrap();
        fs::create_dir(base.path().join("zeta")).unwrap();
        fs::create_dir(base.path().join("alpha")).unwrap();
        fs::write(base.path().join("file.heic"), b"x").unwrap();

        let dirs = list_candidate_directories(base.path()).unwrap();
        assert_eq!(
            dirs,
            vec![base.path().join("alpha"), base.path().join("zeta")]
        );
    }

    #[test]
    fn test_select_without_candidates_fails() {
        assert!(matches!(
            select_source_directory(&[]),
            Err(ConvertError::InvalidConfig(_))
        ));
    }
}
