use std::path::PathBuf;

use crate::config::config::{CollisionPolicy, DispatchPolicy};
use crate::config::ports::AppConfig;
use crate::models::task::{ConversionOutcome, TaskReport};

#[derive(Clone, Debug)]
pub struct ConversionInput {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub policy: DispatchPolicy,
    pub jobs: usize,
    pub collision: CollisionPolicy,
    pub no_progress: bool,
}

impl From<AppConfig> for ConversionInput {
    fn from(config: AppConfig) -> Self {
        ConversionInput {
            source_dir: config.source_dir,
            destination_dir: config.destination_dir,
            policy: config.policy,
            jobs: config.jobs,
            collision: config.collision,
            no_progress: config.no_progress,
        }
    }
}

#[derive(Debug)]
pub struct ConversionOutput {
    pub output_path: PathBuf,
    pub summary: RunSummary,
}

/// 單次執行的共享狀態：總數在掃描後固定，完成數只增不減
#[derive(Debug)]
pub struct RunState {
    total: usize,
    completed: usize,
}

impl RunState {
    pub fn new(total: usize) -> Self {
        RunState {
            total,
            completed: 0,
        }
    }

    /// 記錄一個結果。已達總數時回傳 false 且不增加計數。
    pub fn record(&mut self) -> bool {
        if self.completed >= self.total {
            return false;
        }
        self.completed += 1;
        true
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        RunSummary {
            total,
            ..Default::default()
        }
    }

    pub fn add(&mut self, report: &TaskReport) {
        match &report.outcome {
            ConversionOutcome::Success => self.succeeded += 1,
            ConversionOutcome::Failure(reason) => {
                self.failed += 1;
                self.failures
                    .push((report.source_path.clone(), reason.clone()));
            }
        }
    }

    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn tally_line(&self) -> String {
        format!(
            "成功 {} 個，失敗 {} 個，共 {} 個檔案",
            self.succeeded, self.failed, self.total
        )
    }
}
