use super::engine::MediaEngine;
use super::error::{SegmentError, SegmentResult};
use super::planner::TimeWindow;
use super::prober::SourceMedia;
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 已產生的片段檔案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 從 1 開始的序號，與時間順序一致
    pub index: usize,
    pub window: TimeWindow,
    pub path: PathBuf,
}

impl Segment {
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

pub struct SegmentExtractor<E> {
    engine: E,
}

impl<E: MediaEngine> SegmentExtractor<E> {
    pub const fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn extract(
        &self,
        source: &SourceMedia,
        index: usize,
        window: TimeWindow,
        destination: &Path,
    ) -> SegmentResult<Segment> {
        info!(
            "generating clip {index} from {}s to {}s -> {}",
            window.start,
            window.end,
            destination.display()
        );

        let failed = |diagnostic: String| SegmentError::ExtractionFailed {
            index,
            window,
            diagnostic,
        };

        // 舊的同名檔案必須先移除，否則無法判斷這次是否真的有輸出
        match fs::remove_file(destination) {
            Ok(()) => debug!("已移除舊片段: {}", destination.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(failed(format!(
                    "無法移除舊片段 {}: {e}",
                    destination.display()
                )));
            }
        }

        self.engine
            .extract(&source.path, window, destination)
            .map_err(|failure| failed(failure.diagnostic))?;

        if !destination.is_file() {
            return Err(failed(format!("輸出檔案未建立: {}", destination.display())));
        }

        Ok(Segment {
            index,
            window,
            path: destination.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::engine::EngineFailure;
    use std::fs;
    use tempfile::TempDir;

    /// 寫檔與否由 `write_output` 決定，用來模擬 ffmpeg 成功但沒有輸出的情況
    struct StubEngine {
        write_output: bool,
        failure: Option<&'static str>,
    }

    impl MediaEngine for StubEngine {
        fn probe(&self, _source: &Path) -> Result<String, EngineFailure> {
            Ok("10".to_string())
        }

        fn extract(&self, _: &Path, _: TimeWindow, destination: &Path) -> Result<(), EngineFailure> {
            if let Some(message) = self.failure {
                return Err(EngineFailure::new(message));
            }
            if self.write_output {
                fs::write(destination, b"segment").map_err(|e| EngineFailure::new(e.to_string()))?;
            }
            Ok(())
        }
    }

    fn source(dir: &TempDir) -> SourceMedia {
        SourceMedia {
            path: dir.path().join("talk.mp4"),
            duration_seconds: 10.0,
        }
    }

    #[test]
    fn test_extract_success() {
        let dir = TempDir::new().unwrap();
        let extractor = SegmentExtractor::new(StubEngine {
            write_output: true,
            failure: None,
        });
        let destination = dir.path().join("talk_1.mp4");
        let window = TimeWindow { start: 0, end: 8 };

        let segment = extractor
            .extract(&source(&dir), 1, window, &destination)
            .unwrap();

        assert_eq!(segment.index, 1);
        assert_eq!(segment.window, window);
        assert_eq!(segment.file_name(), "talk_1.mp4");
        assert!(destination.exists());
    }

    #[test]
    fn test_extract_engine_failure() {
        let dir = TempDir::new().unwrap();
        let extractor = SegmentExtractor::new(StubEngine {
            write_output: false,
            failure: Some("Unsupported codec"),
        });
        let err = extractor
            .extract(
                &source(&dir),
                2,
                TimeWindow { start: 8, end: 10 },
                &dir.path().join("talk_2.mp4"),
            )
            .unwrap_err();

        match err {
            SegmentError::ExtractionFailed {
                index,
                window,
                diagnostic,
            } => {
                assert_eq!(index, 2);
                assert_eq!(window, TimeWindow { start: 8, end: 10 });
                assert_eq!(diagnostic, "Unsupported codec");
            }
            other => panic!("預期 ExtractionFailed，實際: {other:?}"),
        }
    }

    #[test]
    fn test_extract_missing_output_is_failure() {
        let dir = TempDir::new().unwrap();
        let extractor = SegmentExtractor::new(StubEngine {
            write_output: false,
            failure: None,
        });
        let err = extractor
            .extract(
                &source(&dir),
                1,
                TimeWindow { start: 0, end: 8 },
                &dir.path().join("talk_1.mp4"),
            )
            .unwrap_err();
        assert_eq!(err.failed_index(), Some(1));
    }

    #[test]
    fn test_stale_output_does_not_count_as_extracted() {
        let dir = TempDir::new().unwrap();
        let destination = dir.path().join("talk_1.mp4");
        fs::write(&destination, b"left over from an earlier run").unwrap();

        let extractor = SegmentExtractor::new(StubEngine {
            write_output: false,
            failure: None,
        });
        let err = extractor
            .extract(&source(&dir), 1, TimeWindow { start: 0, end: 8 }, &destination)
            .unwrap_err();

        assert!(matches!(err, SegmentError::ExtractionFailed { index: 1, .. }));
        assert!(!destination.exists());
    }
}
