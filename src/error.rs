use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 轉換流程的錯誤型別
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("無法讀取來源目錄 {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("無法建立輸出目錄 {path}: {source}")]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("解碼失敗 {file}: {reason}")]
    Decode { file: String, reason: String },

    #[error("編碼失敗 {file}: {reason}")]
    Encode { file: String, reason: String },

    #[error("寫入失敗 {file}: {source}")]
    Write {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("互動輸入失敗: {0}")]
    Prompt(String),

    #[error("無法建立執行緒池: {0}")]
    ThreadPool(String),
}

impl ConvertError {
    pub fn decode(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    pub fn encode(file: impl Into<String>, reason: impl ToString) -> Self {
        Self::Encode {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<dialoguer::Error> for ConvertError {
    fn from(e: dialoguer::Error) -> Self {
        Self::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
