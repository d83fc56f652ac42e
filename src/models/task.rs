use std::fmt;
use std::path::{Path, PathBuf};

/// 單一檔案的轉換工作，建立後不可變，由一個 Worker 消耗
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionTask {
    pub source_path: PathBuf,
    pub destination_dir: PathBuf,
    pub output_name: String,
}

impl ConversionTask {
    pub fn new(source_path: PathBuf, destination_dir: PathBuf, output_name: String) -> Self {
        ConversionTask {
            source_path,
            destination_dir,
            output_name,
        }
    }

    pub fn destination_path(&self) -> PathBuf {
        self.destination_dir.join(&self.output_name)
    }

    pub fn source_name(&self) -> String {
        display_name(&self.source_path)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionOutcome {
    Success,
    Failure(String),
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success)
    }
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionOutcome::Success => write!(f, "成功"),
            ConversionOutcome::Failure(reason) => write!(f, "失敗：{}", reason),
        }
    }
}

/// Worker 回報給分派器的結果
#[derive(Clone, Debug)]
pub struct TaskReport {
    pub source_path: PathBuf,
    pub outcome: ConversionOutcome,
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
