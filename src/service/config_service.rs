use std::path::PathBuf;

use crate::config::config::{default_jobs, CollisionPolicy, DispatchPolicy};
use crate::config::ports::{AppConfig, ConfigPort};
use crate::error::Result;

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器：只需來源與輸出目錄
pub struct DefaultConfigAdapter {
    source: PathBuf,
    destination: PathBuf,
}

impl DefaultConfigAdapter {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        DefaultConfigAdapter {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        Ok(AppConfig {
            source_dir: self.source.clone(),
            destination_dir: self.destination.clone(),
            policy: DispatchPolicy::Bounded,
            jobs: default_jobs(),
            collision: CollisionPolicy::Report,
            no_progress: false,
        })
    }
}
