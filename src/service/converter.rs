use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, error};
use tempfile::NamedTempFile;

use crate::error::{ConvertError, Result};
use crate::models::task::{display_name, ConversionOutcome, ConversionTask};
use crate::service::traits::i_service::ImageCodec;

pub const JPG_EXTENSION: &str = "jpg";

/// 以來源主檔名加上 .jpg 作為輸出檔名
pub fn jpg_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| display_name(source));
    format!("{}.{}", stem, JPG_EXTENSION)
}

/// 轉換單一檔案。任何錯誤都在此轉為 Failure，不會向外傳遞。
pub fn convert(task: &ConversionTask, codec: &dyn ImageCodec) -> ConversionOutcome {
    match convert_file(task, codec) {
        Ok(()) => {
            debug!(
                "轉換完成：{} -> {}",
                task.source_path.display(),
                task.destination_path().display()
            );
            ConversionOutcome::Success
        }
        Err(e) => {
            error!("轉換失敗 {}: {}", task.source_name(), e);
            ConversionOutcome::Failure(e.to_string())
        }
    }
}

fn convert_file(task: &ConversionTask, codec: &dyn ImageCodec) -> Result<()> {
    let name = task.source_name();
    let rgb = codec.decode(&task.source_path)?.to_rgb8();

    // 先寫入同目錄的暫存檔再改名，失敗時不會留下半個輸出檔
    let write_err = |source| ConvertError::Write {
        file: name.clone(),
        source,
    };
    let temp = NamedTempFile::new_in(&task.destination_dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        codec.encode_jpeg(&rgb, &mut writer).map_err(|e| match e {
            ConvertError::Encode { reason, .. } => ConvertError::encode(&name, reason),
            other => other,
        })?;
        writer.flush().map_err(write_err)?;
    }
    temp.persist(task.destination_path())
        .map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::codec::ImageCrateCodec;
    use image::{DynamicImage, GrayImage, Luma, RgbImage, Rgba, RgbaImage};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    struct FixedCodec(DynamicImage);

    impl ImageCodec for FixedCodec {
        fn decode(&self, _path: &Path) -> Result<DynamicImage> {
            Ok(self.0.clone())
        }
    }

    /// 寫出部分位元組後才回報編碼失敗
    struct HalfWritingCodec;

    impl ImageCodec for HalfWritingCodec {
        fn decode(&self, _path: &Path) -> Result<DynamicImage> {
            Ok(DynamicImage::new_rgb8(4, 4))
        }

        fn encode_jpeg(&self, _image: &RgbImage, writer: &mut dyn Write) -> Result<()> {
            writer
                .write_all(&[0xFF, 0xD8, 0xFF, 0xE0])
                .map_err(|e| ConvertError::encode("", e))?;
            Err(ConvertError::encode("", "disk quota exceeded"))
        }
    }

    fn task_for(source: PathBuf, dest: &Path) -> ConversionTask {
        let name = jpg_file_name(&source);
        ConversionTask::new(source, dest.to_path_buf(), name)
    }

    #[test]
    fn test_jpg_file_name() {
        assert_eq!(jpg_file_name(Path::new("/a/IMG_1.HEIC")), "IMG_1.jpg");
        assert_eq!(jpg_file_name(Path::new("photo.v2.heic")), "photo.v2.jpg");
    }

    #[test]
    fn test_convert_rgba_source_writes_valid_jpeg() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        let source = src.path().join("clear.heic");
        fs::write(&source, b"stub").unwrap();

        let codec = FixedCodec(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            6,
            Rgba([255, 0, 0, 10]),
        )));
        let task = task_for(source, dst.path());
        assert_eq!(convert(&task, &codec), ConversionOutcome::Success);

        let out = dst.path().join("clear.jpg");
        let decoded = image::open(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_convert_grayscale_source() {
        let dst = tempdir().unwrap();
        let codec = FixedCodec(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            3,
            3,
            Luma([128]),
        )));
        let task = task_for(PathBuf::from("gray.heic"), dst.path());
        assert!(convert(&task, &codec).is_success());
        let bytes = fs::read(dst.path().join("gray.jpg")).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_convert_overwrites_existing_destination() {
        let dst = tempdir().unwrap();
        fs::write(dst.path().join("same.jpg"), b"old").unwrap();
        let codec = FixedCodec(DynamicImage::new_rgb8(2, 2));
        let task = task_for(PathBuf::from("same.heic"), dst.path());
        assert!(convert(&task, &codec).is_success());
        assert_ne!(fs::read(dst.path().join("same.jpg")).unwrap(), b"old");
    }

    #[test]
    fn test_corrupt_source_fails_without_output() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        let source = src.path().join("corrupt.png");
        fs::write(&source, b"garbage").unwrap();

        let task = task_for(source, dst.path());
        match convert(&task, &ImageCrateCodec) {
            ConversionOutcome::Failure(reason) => assert!(reason.contains("corrupt.png")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(fs::read_dir(dst.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_encode_failure_keeps_previous_output_and_removes_temp() {
        let dst = tempdir().unwrap();
        let existing = dst.path().join("keep.jpg");
        fs::write(&existing, b"old").unwrap();

        let task = task_for(PathBuf::from("keep.heic"), dst.path());
        match convert(&task, &HalfWritingCodec) {
            ConversionOutcome::Failure(reason) => {
                assert!(reason.contains("keep.heic"));
                assert!(reason.contains("disk quota exceeded"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let entries: Vec<_> = fs::read_dir(dst.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["keep.jpg".to_string()]);
        assert_eq!(fs::read(&existing).unwrap(), b"old");
    }

    #[test]
    fn test_missing_destination_dir_fails() {
        let dst = tempdir().unwrap();
        let codec = FixedCodec(DynamicImage::new_rgb8(2, 2));
        let task = task_for(PathBuf::from("x.heic"), &dst.path().join("gone"));
        assert!(!convert(&task, &codec).is_success());
    }
}
