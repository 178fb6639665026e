//! 片段後製階段
//!
//! 目前只有複製一份到 processed 資料夾；品牌浮水印、直式裁切、
//! 字幕燒錄等之後都實作同一個 [`PostProcessor`] 介面即可，
//! 不需要改動切割流程本身。

use super::error::{SegmentError, SegmentResult};
use super::extractor::Segment;
use crate::tools::file_digest;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// 由單一片段衍生的後製檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedArtifact {
    /// 對應片段的序號
    pub index: usize,
    pub path: PathBuf,
}

impl ProcessedArtifact {
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

pub trait PostProcessor: Send + Sync {
    fn name(&self) -> &str;

    /// 處理一個片段，結果寫入 `output_dir`
    fn process(&self, segment: &Segment, output_dir: &Path) -> SegmentResult<ProcessedArtifact>;
}

/// `<segmentStem>_processed.<ext>`
#[must_use]
pub fn processed_file_name(segment_path: &Path) -> String {
    let stem = segment_path
        .file_stem()
        .map_or_else(|| "clip".to_string(), |s| s.to_string_lossy().to_string());
    match segment_path.extension() {
        Some(ext) => format!("{stem}_processed.{}", ext.to_string_lossy()),
        None => format!("{stem}_processed"),
    }
}

/// 原樣複製片段，並以 BLAKE3 比對確認內容一致
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyProcessor;

impl CopyProcessor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PostProcessor for CopyProcessor {
    fn name(&self) -> &str {
        "copy"
    }

    fn process(&self, segment: &Segment, output_dir: &Path) -> SegmentResult<ProcessedArtifact> {
        let failed = |diagnostic: String| SegmentError::ProcessingFailed {
            index: segment.index,
            diagnostic,
        };

        let output_path = output_dir.join(processed_file_name(&segment.path));

        fs::copy(&segment.path, &output_path).map_err(|e| {
            failed(format!(
                "無法複製 {} -> {}: {e}",
                segment.path.display(),
                output_path.display()
            ))
        })?;

        let original = file_digest(&segment.path).map_err(|e| failed(format!("{e:#}")))?;
        let copied = file_digest(&output_path).map_err(|e| failed(format!("{e:#}")))?;
        if original != copied {
            return Err(failed(format!("複製後內容不一致: {}", output_path.display())));
        }

        debug!("processed clip copied to {}", output_path.display());

        Ok(ProcessedArtifact {
            index: segment.index,
            path: output_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::planner::TimeWindow;
    use tempfile::TempDir;

    #[test]
    fn test_processed_file_name() {
        assert_eq!(
            processed_file_name(Path::new("/clips/talk_1.mp4")),
            "talk_1_processed.mp4"
        );
        assert_eq!(
            processed_file_name(Path::new("/clips/talk_part3.mkv")),
            "talk_part3_processed.mkv"
        );
        assert_eq!(processed_file_name(Path::new("/clips/raw_2")), "raw_2_processed");
    }

    #[test]
    fn test_copy_processor_duplicates_bytes() {
        let dir = TempDir::new().unwrap();
        let processed_dir = dir.path().join("processed");
        fs::create_dir_all(&processed_dir).unwrap();

        let segment_path = dir.path().join("talk_1.mp4");
        fs::write(&segment_path, b"segment bytes").unwrap();
        let segment = Segment {
            index: 1,
            window: TimeWindow { start: 0, end: 8 },
            path: segment_path,
        };

        let artifact = CopyProcessor::new().process(&segment, &processed_dir).unwrap();

        assert_eq!(artifact.index, 1);
        assert_eq!(artifact.file_name(), "talk_1_processed.mp4");
        assert_eq!(fs::read(&artifact.path).unwrap(), b"segment bytes");
    }

    #[test]
    fn test_copy_processor_missing_segment() {
        let dir = TempDir::new().unwrap();
        let segment = Segment {
            index: 4,
            window: TimeWindow { start: 24, end: 32 },
            path: dir.path().join("gone_4.mp4"),
        };

        let err = CopyProcessor::new().process(&segment, dir.path()).unwrap_err();
        assert!(matches!(err, SegmentError::ProcessingFailed { index: 4, .. }));
    }
}
