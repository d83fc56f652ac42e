use std::path::PathBuf;

use crate::models::task::ConversionTask;

/// 因輸出檔名衝突而未派送的來源檔案
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedSource {
    pub source_path: PathBuf,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct Plan {
    pub tasks: Vec<ConversionTask>,
    pub rejected: Vec<RejectedSource>,
}

impl Plan {
    pub fn total(&self) -> usize {
        self.tasks.len() + self.rejected.len()
    }
}
