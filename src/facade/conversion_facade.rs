use std::fs;
use std::sync::Arc;

use log::{info, warn};

use crate::config::ports::{AppConfig, ConversionPort};
use crate::error::{ConvertError, Result};
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{ConversionInput, ConversionOutput, RunSummary};
use crate::models::task::{ConversionOutcome, TaskReport};
use crate::service::codec::default_codec;
use crate::service::dispatcher::Dispatcher;
use crate::service::planner::plan;
use crate::service::reporter::observe;
use crate::service::scanner::ScannerService;
use crate::service::traits::i_service::{ImageCodec, ScannerServiceTrait};
use crate::utils::utils::create_progress_bar;

pub struct ConversionFacade {
    scanner: Box<dyn ScannerServiceTrait>,
    codec: Arc<dyn ImageCodec>,
}

impl ConversionFacade {
    pub fn new(scanner: Box<dyn ScannerServiceTrait>, codec: Arc<dyn ImageCodec>) -> Self {
        ConversionFacade { scanner, codec }
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_conversion(&self, input: ConversionInput) -> Result<ConversionOutput> {
        info!(
            "開始轉換，來源目錄：{}，輸出目錄：{}",
            input.source_dir.display(),
            input.destination_dir.display()
        );

        let files = self.scanner.scan(&input.source_dir)?;

        fs::create_dir_all(&input.destination_dir).map_err(|source| {
            ConvertError::DestinationUnavailable {
                path: input.destination_dir.clone(),
                source,
            }
        })?;

        if files.is_empty() {
            warn!("所選目錄中找不到 HEIC 檔案：{}", input.source_dir.display());
            return Ok(ConversionOutput {
                output_path: input.destination_dir,
                summary: RunSummary::new(0),
            });
        }

        let plan = plan(files, &input.destination_dir, input.collision);
        let total = plan.total();
        let dispatcher = Dispatcher::new(input.policy, input.jobs);
        info!(
            "正在處理 {} 個檔案，策略：{:?}，Worker 數量：{}",
            total,
            input.policy,
            dispatcher.worker_count(plan.tasks.len())
        );

        let rejected = plan.rejected.into_iter().map(|r| TaskReport {
            source_path: r.source_path,
            outcome: ConversionOutcome::Failure(r.reason),
        });
        let stream = dispatcher.dispatch(plan.tasks, Arc::clone(&self.codec))?;

        let progress = create_progress_bar(total as u64, input.no_progress);
        let summary = observe(rejected.chain(stream), total, &progress);

        for (path, reason) in &summary.failures {
            warn!("未轉換：{}（{}）", path.display(), reason);
        }
        info!("{}", summary.tally_line());

        Ok(ConversionOutput {
            output_path: input.destination_dir,
            summary,
        })
    }
}

// 以預設掃描器與編解碼器執行轉換的 Port 實作
pub struct ConversionAdapter;

impl ConversionPort for ConversionAdapter {
    fn execute(&self, config: AppConfig) -> Result<ConversionOutput> {
        let facade = ConversionFacade::new(
            Box::new(ScannerService::new()),
            Arc::from(default_codec()),
        );
        facade.execute_conversion(ConversionInput::from(config))
    }
}
