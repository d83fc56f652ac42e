use crate::error::Result;
use crate::models::conversion::{ConversionInput, ConversionOutput};

// Facade 接口，負責協調掃描、分派與進度回報
pub trait ConversionFacadeTrait: Send + Sync {
    /// 執行整批轉換
    /// # 參數
    /// - input: 來源目錄、輸出目錄與分派設定
    /// # 回傳
    /// - 成功時返回輸出目錄與統計；只有目錄層級的錯誤會回傳 Err
    fn execute_conversion(&self, input: ConversionInput) -> Result<ConversionOutput>;
}
