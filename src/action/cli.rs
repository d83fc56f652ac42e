use clap::Parser;
use std::path::PathBuf;

use crate::action::interactive::process_interactive_mode;
use crate::config::config::{
    validate_destination, validate_jobs, validate_source_dir, Cli, CollisionPolicy,
    DispatchPolicy,
};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::error::Result;
use crate::facade::conversion_facade::ConversionAdapter;
use crate::models::conversion::ConversionOutput;
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::utils::utils::setup_logging;

pub fn process_args(args: Vec<String>) -> Result<ConversionOutput> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode(args)
    }
}

pub fn process_cli_mode(args: Vec<String>) -> Result<ConversionOutput> {
    let cli = Cli::parse_from(args);
    setup_logging(&cli.log_level);

    // 只提供輸入與輸出目錄時使用預設配置
    let config_port: Box<dyn ConfigPort> = if is_default_config(&cli) {
        log::info!("未提供選項參數，使用預設配置：固定大小執行緒池，檔名衝突時回報");
        validate_source_dir(&cli.input)?;
        validate_destination(&cli.output)?;
        Box::new(DefaultConfigAdapter::new(&cli.input, cli.output.trim()))
    } else {
        Box::new(CliConfigAdapter::new(cli))
    };

    let config_service = ConfigService::new(config_port);
    let config = config_service.get_config()?;
    ConversionAdapter.execute(config)
}

pub fn is_default_config(cli: &Cli) -> bool {
    cli.policy == DispatchPolicy::Bounded
        && cli.jobs.is_none()
        && cli.collision == CollisionPolicy::Report
        && !cli.no_progress
        && cli.log_level == "info"
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        let source_dir = validate_source_dir(&self.cli.input)?.to_path_buf();
        validate_destination(&self.cli.output)?;
        let jobs = validate_jobs(self.cli.jobs)?;

        log::debug!(
            "CLI 配置：policy={:?}, jobs={}, on_collision={:?}, no_progress={}",
            self.cli.policy,
            jobs,
            self.cli.collision,
            self.cli.no_progress
        );

        Ok(AppConfig {
            source_dir,
            destination_dir: PathBuf::from(self.cli.output.trim()),
            policy: self.cli.policy,
            jobs,
            collision: self.cli.collision,
            no_progress: self.cli.no_progress,
        })
    }
}
