//! 上傳檔案的前置檢查與暫存
//!
//! 檢查片段長度範圍與檔案大小，再把來源檔複製到 uploads 資料夾。
//! 同名檔案會直接覆蓋。

use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MAX_UPLOAD_BYTES: u64 = 300 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("片段長度必須介於 {min} 到 {max} 秒之間（收到 {value}）")]
    ClipLengthOutOfRange { value: u64, min: u64, max: u64 },

    #[error("找不到上傳檔案: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("檔案太大（{size} bytes，上限 {limit} bytes）")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("無法暫存上傳檔案 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 已複製到 uploads 資料夾的檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    pub original_name: String,
    pub path: PathBuf,
    pub size: u64,
}

pub fn validate_clip_length(value: u64, min: u64, max: u64) -> Result<u64, IntakeError> {
    if value < min || value > max {
        return Err(IntakeError::ClipLengthOutOfRange { value, min, max });
    }
    Ok(value)
}

pub fn stage_upload(
    source: &Path,
    upload_dir: &Path,
    max_bytes: u64,
) -> Result<StagedUpload, IntakeError> {
    let io_error = |path: &Path, source: std::io::Error| IntakeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = match fs::metadata(source) {
        Ok(meta) if meta.is_file() => meta,
        _ => return Err(IntakeError::SourceMissing(source.to_path_buf())),
    };

    let size = metadata.len();
    if size > max_bytes {
        return Err(IntakeError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let original_name = source
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| IntakeError::SourceMissing(source.to_path_buf()))?;

    fs::create_dir_all(upload_dir).map_err(|e| io_error(upload_dir, e))?;
    let destination = upload_dir.join(&original_name);

    // 來源已在 uploads 資料夾內時不可複製到自己身上（會被截斷）
    let already_staged = match (fs::canonicalize(source), fs::canonicalize(&destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };

    if !already_staged {
        fs::copy(source, &destination).map_err(|e| io_error(&destination, e))?;
        info!("上傳檔案已暫存: {}", destination.display());
    }

    Ok(StagedUpload {
        original_name,
        path: destination,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_clip_length_bounds() {
        assert_eq!(validate_clip_length(8, 3, 60).unwrap(), 8);
        assert_eq!(validate_clip_length(3, 3, 60).unwrap(), 3);
        assert_eq!(validate_clip_length(60, 3, 60).unwrap(), 60);
        assert!(matches!(
            validate_clip_length(2, 3, 60),
            Err(IntakeError::ClipLengthOutOfRange { value: 2, .. })
        ));
        assert!(validate_clip_length(61, 3, 60).is_err());
    }

    #[test]
    fn test_stage_upload_copies_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("talk.mp4");
        fs::write(&source, b"video").unwrap();
        let uploads = dir.path().join("uploads");

        let staged = stage_upload(&source, &uploads, MAX_UPLOAD_BYTES).unwrap();

        assert_eq!(staged.original_name, "talk.mp4");
        assert_eq!(staged.path, uploads.join("talk.mp4"));
        assert_eq!(staged.size, 5);
        assert_eq!(fs::read(&staged.path).unwrap(), b"video");
    }

    #[test]
    fn test_stage_upload_in_place() {
        let dir = TempDir::new().unwrap();
        let uploads = dir.path().join("uploads");
        fs::create_dir_all(&uploads).unwrap();
        let source = uploads.join("talk.mp4");
        fs::write(&source, b"video").unwrap();

        let staged = stage_upload(&source, &uploads, MAX_UPLOAD_BYTES).unwrap();
        assert_eq!(fs::read(&staged.path).unwrap(), b"video");
    }

    #[test]
    fn test_stage_upload_too_large() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("big.mp4");
        fs::write(&source, vec![0u8; 64]).unwrap();

        let err = stage_upload(&source, &dir.path().join("uploads"), 32).unwrap_err();
        assert!(matches!(err, IntakeError::FileTooLarge { size: 64, limit: 32 }));
        assert!(!dir.path().join("uploads").join("big.mp4").exists());
    }

    #[test]
    fn test_stage_upload_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = stage_upload(
            &dir.path().join("missing.mp4"),
            &dir.path().join("uploads"),
            MAX_UPLOAD_BYTES,
        )
        .unwrap_err();
        assert!(matches!(err, IntakeError::SourceMissing(_)));
    }
}
