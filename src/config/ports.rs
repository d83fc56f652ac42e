use std::path::PathBuf;

use crate::config::config::{CollisionPolicy, DispatchPolicy};
use crate::error::Result;
use crate::models::conversion::ConversionOutput;

// 應用配置結構體，由入口層注入核心
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub policy: DispatchPolicy,
    pub jobs: usize,
    pub collision: CollisionPolicy,
    pub no_progress: bool,
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> Result<AppConfig>;
}

// 轉換執行的 Port
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> Result<ConversionOutput>;
}
