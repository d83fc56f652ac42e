use log::debug;

use crate::models::conversion::{RunState, RunSummary};
use crate::models::task::{display_name, TaskReport};
use crate::utils::utils::ProgressManager;

/// 逐一消耗結果。每個結果（不論成敗）都算一次完成，只有成功會推進進度條。
/// 完成數達到總數或結果耗盡時結束。
pub fn observe<I>(outcomes: I, total: usize, progress: &ProgressManager) -> RunSummary
where
    I: IntoIterator<Item = TaskReport>,
{
    let mut state = RunState::new(total);
    let mut summary = RunSummary::new(total);

    for report in outcomes {
        if !state.record() {
            debug!("忽略超出總數的結果：{}", report.source_path.display());
            break;
        }
        debug!("{}：{}", display_name(&report.source_path), report.outcome);
        if report.outcome.is_success() {
            progress.advance(&display_name(&report.source_path));
        }
        summary.add(&report);
        if state.is_done() {
            break;
        }
    }

    progress.finish(summary.succeeded, summary.failed);
    summary
}
