use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

use crate::error::{ConvertError, Result};

pub const JPEG_QUALITY: u8 = 90;

// 掃描服務接口，負責列出待轉換的檔案
pub trait ScannerServiceTrait: Send + Sync {
    /// 列出目錄下（不遞迴）所有 .heic 檔案
    /// # 參數
    /// - dir: 來源目錄
    /// # 回傳
    /// - 成功時返回檔案路徑列表，目錄無法讀取時返回 DirectoryUnreadable
    fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

// 編解碼接口，HEIC 解碼與 JPEG 編碼都經由此處
pub trait ImageCodec: Send + Sync {
    /// 將來源檔案解碼為記憶體中的圖片
    fn decode(&self, path: &Path) -> Result<DynamicImage>;

    /// 將三通道圖片編碼為 JPEG 寫入 writer
    fn encode_jpeg(&self, image: &RgbImage, writer: &mut dyn Write) -> Result<()> {
        let mut encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
        encoder
            .encode_image(image)
            .map_err(|e| ConvertError::encode("jpeg", e))
    }
}
