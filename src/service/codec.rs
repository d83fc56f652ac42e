use std::path::Path;

use image::DynamicImage;

use crate::error::{ConvertError, Result};
use crate::models::task::display_name;
use crate::service::traits::i_service::ImageCodec;

/// 以 image crate 解碼，不支援 HEIC，僅在未啟用 heif 功能時作為後備
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage> {
        image::open(path).map_err(|e| ConvertError::decode(display_name(path), e))
    }
}

#[cfg(feature = "heif")]
pub use heif::HeifCodec;

#[cfg(feature = "heif")]
mod heif {
    use std::path::Path;

    use image::{DynamicImage, RgbImage, RgbaImage};
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    use crate::error::{ConvertError, Result};
    use crate::models::task::display_name;
    use crate::service::traits::i_service::ImageCodec;

    /// 透過系統 libheif 解碼 HEIC
    pub struct HeifCodec;

    impl HeifCodec {
        pub fn new() -> Self {
            HeifCodec
        }
    }

    impl Default for HeifCodec {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ImageCodec for HeifCodec {
        fn decode(&self, path: &Path) -> Result<DynamicImage> {
            let name = display_name(path);
            let ctx = HeifContext::read_from_file(path.to_string_lossy().as_ref())
                .map_err(|e| ConvertError::decode(&name, e))?;
            let handle = ctx
                .primary_image_handle()
                .map_err(|e| ConvertError::decode(&name, e))?;

            let has_alpha = handle.has_alpha_channel();
            let chroma = if has_alpha {
                RgbChroma::Rgba
            } else {
                RgbChroma::Rgb
            };
            let lib_heif = LibHeif::new();
            let decoded = lib_heif
                .decode(&handle, ColorSpace::Rgb(chroma), None)
                .map_err(|e| ConvertError::decode(&name, e))?;

            let planes = decoded.planes();
            let plane = planes
                .interleaved
                .ok_or_else(|| ConvertError::decode(&name, "缺少 RGB 平面"))?;

            let channels: usize = if has_alpha { 4 } else { 3 };
            let width = plane.width;
            let height = plane.height;
            let row_len = width as usize * channels;
            let mut pixels = Vec::with_capacity(row_len * height as usize);
            for row in plane.data.chunks(plane.stride.max(1)).take(height as usize) {
                let row = row
                    .get(..row_len)
                    .ok_or_else(|| ConvertError::decode(&name, "平面資料長度不足"))?;
                pixels.extend_from_slice(row);
            }

            let image = if has_alpha {
                RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
            } else {
                RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8)
            };
            image.ok_or_else(|| ConvertError::decode(&name, "無法建立圖片緩衝區"))
        }
    }
}

/// 依編譯功能選擇預設的編解碼器
pub fn default_codec() -> Box<dyn ImageCodec> {
    #[cfg(feature = "heif")]
    let codec: Box<dyn ImageCodec> = Box::new(HeifCodec::new());
    #[cfg(not(feature = "heif"))]
    let codec: Box<dyn ImageCodec> = {
        log::warn!("未啟用 heif 功能，HEIC 檔案將無法解碼");
        Box::new(ImageCrateCodec)
    };
    codec
}
