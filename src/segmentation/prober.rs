use super::engine::MediaEngine;
use super::error::{SegmentError, SegmentResult};
use log::debug;
use std::fs::File;
use std::path::{Path, PathBuf};

/// 已確認長度的來源影片
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMedia {
    pub path: PathBuf,
    /// ffprobe 回報的長度（秒，含小數）
    pub duration_seconds: f64,
}

impl SourceMedia {
    /// 規劃用的整數秒數（無條件捨去）
    #[must_use]
    pub fn planning_seconds(&self) -> u64 {
        self.duration_seconds.trunc() as u64
    }

    #[must_use]
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map_or_else(|| "clip".to_string(), |s| s.to_string_lossy().to_string())
    }

    /// 副檔名（不含點），沒有副檔名時使用 mp4
    #[must_use]
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map_or_else(|| "mp4".to_string(), |s| s.to_string_lossy().to_string())
    }
}

pub struct MediaProber<E> {
    engine: E,
}

impl<E: MediaEngine> MediaProber<E> {
    pub const fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn probe(&self, source: &Path) -> SegmentResult<SourceMedia> {
        if !source.is_file() || File::open(source).is_err() {
            return Err(SegmentError::InputNotFound {
                path: source.to_path_buf(),
            });
        }

        let raw = self
            .engine
            .probe(source)
            .map_err(|failure| SegmentError::ProbeFailed {
                path: source.to_path_buf(),
                diagnostic: failure.diagnostic,
            })?;

        let duration = parse_duration(&raw).ok_or_else(|| SegmentError::ProbeFailed {
            path: source.to_path_buf(),
            diagnostic: format!("無法解析長度輸出: {:?}", raw.trim()),
        })?;

        // 不足一秒的影片在整數秒規劃下沒有任何區間
        if !duration.is_finite() || duration < 1.0 {
            return Err(SegmentError::InvalidDuration {
                path: source.to_path_buf(),
                duration,
            });
        }

        debug!("影片長度 {:.3}s: {}", duration, source.display());

        Ok(SourceMedia {
            path: source.to_path_buf(),
            duration_seconds: duration,
        })
    }
}

/// 解析 ffprobe 輸出的第一個非空白行（例如 "20.040000"）
fn parse_duration(raw: &str) -> Option<f64> {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
}
