//! 影片切割流程
//!
//! Prober → Planner → 逐段 Extractor → （可選）後製。
//! 任何一段擷取失敗都會讓整批失敗；先前已寫入的片段檔案保留在磁碟上，
//! 不會回收。

use super::engine::MediaEngine;
use super::error::{SegmentError, SegmentResult};
use super::extractor::{Segment, SegmentExtractor};
use super::planner::{TimeWindow, plan_windows};
use super::post_process::{CopyProcessor, PostProcessor, ProcessedArtifact};
use super::prober::{MediaProber, SourceMedia};
use log::{error, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

pub const DEFAULT_PROCESSED_DIR_NAME: &str = "processed";

/// 片段檔名格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentNaming {
    /// `<stem>_<index>.<ext>`
    #[default]
    Underscore,
    /// `<stem>_part<index>.<ext>`
    Part,
}

impl SegmentNaming {
    #[must_use]
    pub fn file_name(self, stem: &str, index: usize, extension: &str) -> String {
        match self {
            Self::Underscore => format!("{stem}_{index}.{extension}"),
            Self::Part => format!("{stem}_part{index}.{extension}"),
        }
    }
}

impl fmt::Display for SegmentNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underscore => write!(f, "<stem>_<n>.<ext>"),
            Self::Part => write!(f, "<stem>_part<n>.<ext>"),
        }
    }
}

/// 輸出資料夾配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub clips_root: PathBuf,
    pub processed_dir_name: String,
}

impl OutputLayout {
    pub fn new(clips_root: impl Into<PathBuf>) -> Self {
        Self {
            clips_root: clips_root.into(),
            processed_dir_name: DEFAULT_PROCESSED_DIR_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn with_processed_dir_name(mut self, name: impl Into<String>) -> Self {
        self.processed_dir_name = name.into();
        self
    }

    #[must_use]
    pub fn processed_dir(&self) -> PathBuf {
        self.clips_root.join(&self.processed_dir_name)
    }

    /// 以上傳識別碼建立獨立的子資料夾
    #[must_use]
    pub fn scoped(&self, upload_id: &str) -> Self {
        Self {
            clips_root: self.clips_root.join(upload_id),
            processed_dir_name: self.processed_dir_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub naming: SegmentNaming,
    /// 以 rayon 平行擷取各區間，結果仍依序號排列
    pub parallel: bool,
    /// 每次上傳寫入 `<clips_root>/<upload-id>/`
    pub namespace_by_upload: bool,
}

/// 一次切割的結果
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    pub upload_id: Option<String>,
    pub source: PathBuf,
    pub duration_seconds: f64,
    pub clips_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub segments: Vec<Segment>,
    pub processed: Vec<ProcessedArtifact>,
}

impl SegmentationResult {
    #[must_use]
    pub fn count(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn segment_names(&self) -> Vec<String> {
        self.segments.iter().map(Segment::file_name).collect()
    }

    #[must_use]
    pub fn processed_names(&self) -> Vec<String> {
        self.processed.iter().map(ProcessedArtifact::file_name).collect()
    }

    #[must_use]
    pub fn windows(&self) -> Vec<TimeWindow> {
        self.segments.iter().map(|s| s.window).collect()
    }
}

type SegmentCallback = Box<dyn Fn(&Segment) + Send + Sync>;

pub struct SegmentationPipeline<E> {
    engine: E,
    layout: OutputLayout,
    options: PipelineOptions,
    post_processor: Box<dyn PostProcessor>,
    shutdown_signal: Arc<AtomicBool>,
    on_segment: Option<SegmentCallback>,
    upload_id: Option<String>,
}

impl<E: MediaEngine> SegmentationPipeline<E> {
    pub fn new(engine: E, layout: OutputLayout) -> Self {
        Self {
            engine,
            layout,
            options: PipelineOptions::default(),
            post_processor: Box::new(CopyProcessor::new()),
            shutdown_signal: Arc::new(AtomicBool::new(false)),
            on_segment: None,
            upload_id: None,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_post_processor(mut self, post_processor: Box<dyn PostProcessor>) -> Self {
        self.post_processor = post_processor;
        self
    }

    #[must_use]
    pub fn with_shutdown_signal(mut self, shutdown_signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = shutdown_signal;
        self
    }

    /// 指定上傳識別碼並寫入 `<clips_root>/<upload_id>/`；
    /// 未指定但開啟 `namespace_by_upload` 時每次執行自動產生
    #[must_use]
    pub fn with_upload_id(mut self, upload_id: impl Into<String>) -> Self {
        self.upload_id = Some(upload_id.into());
        self
    }

    /// 每產生一個片段呼叫一次（平行模式下可能來自不同執行緒）
    #[must_use]
    pub fn on_segment(mut self, callback: impl Fn(&Segment) + Send + Sync + 'static) -> Self {
        self.on_segment = Some(Box::new(callback));
        self
    }

    pub fn run(
        &self,
        source: &Path,
        clip_length: u64,
        max_clips: usize,
        run_post_processing: bool,
    ) -> SegmentResult<SegmentationResult> {
        let media = MediaProber::new(&self.engine).probe(source)?;

        let windows = plan_windows(media.planning_seconds(), clip_length, max_clips);
        if windows.is_empty() {
            warn!("沒有可切割的區間 (clip_length={clip_length}, max_clips={max_clips})");
        }
        info!(
            "{}: 長度 {:.2}s，切成 {} 段（每段 {}s）",
            source.display(),
            media.duration_seconds,
            windows.len(),
            clip_length
        );

        let upload_id = self.upload_id.clone().or_else(|| {
            self.options
                .namespace_by_upload
                .then(|| Uuid::new_v4().to_string())
        });
        let layout = upload_id
            .as_deref()
            .map_or_else(|| self.layout.clone(), |id| self.layout.scoped(id));

        create_dir(&layout.clips_root)?;
        let processed_dir = layout.processed_dir();
        if run_post_processing {
            create_dir(&processed_dir)?;
        }

        let segments = if self.options.parallel {
            self.extract_parallel(&media, &windows, &layout.clips_root)?
        } else {
            self.extract_sequential(&media, &windows, &layout.clips_root)?
        };

        let mut processed = Vec::new();
        if run_post_processing {
            processed.reserve(segments.len());
            for segment in &segments {
                let artifact = self
                    .post_processor
                    .process(segment, &processed_dir)
                    .inspect_err(|e| error!("後製失敗 [{}]: {e}", self.post_processor.name()))?;
                processed.push(artifact);
            }
        }

        info!(
            "切割完成: {} 個片段，{} 個後製檔案",
            segments.len(),
            processed.len()
        );

        Ok(SegmentationResult {
            upload_id,
            source: media.path,
            duration_seconds: media.duration_seconds,
            clips_dir: layout.clips_root,
            processed_dir,
            segments,
            processed,
        })
    }

    fn destination(&self, media: &SourceMedia, clips_dir: &Path, index: usize) -> PathBuf {
        let name = self
            .options
            .naming
            .file_name(&media.stem(), index, &media.extension());
        clips_dir.join(name)
    }

    fn notify(&self, segment: &Segment) {
        if let Some(callback) = &self.on_segment {
            callback(segment);
        }
    }

    fn extract_sequential(
        &self,
        media: &SourceMedia,
        windows: &[TimeWindow],
        clips_dir: &Path,
    ) -> SegmentResult<Vec<Segment>> {
        let extractor = SegmentExtractor::new(&self.engine);
        let mut segments = Vec::with_capacity(windows.len());

        for (offset, &window) in windows.iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷信號，停止切割");
                return Err(SegmentError::Cancelled {
                    completed: segments.len(),
                });
            }

            let index = offset + 1;
            let destination = self.destination(media, clips_dir, index);
            let segment = extractor
                .extract(media, index, window, &destination)
                .inspect_err(|e| error!("{e}"))?;

            self.notify(&segment);
            segments.push(segment);
        }

        Ok(segments)
    }

    fn extract_parallel(
        &self,
        media: &SourceMedia,
        windows: &[TimeWindow],
        clips_dir: &Path,
    ) -> SegmentResult<Vec<Segment>> {
        let extractor = SegmentExtractor::new(&self.engine);
        let failed = AtomicBool::new(false);

        // None 代表因失敗或中斷而未啟動的區間
        let results: Vec<Option<SegmentResult<Segment>>> = windows
            .par_iter()
            .enumerate()
            .map(|(offset, &window)| {
                if failed.load(Ordering::SeqCst) || self.shutdown_signal.load(Ordering::SeqCst) {
                    return None;
                }

                let index = offset + 1;
                let destination = self.destination(media, clips_dir, index);
                let result = extractor.extract(media, index, window, &destination);

                match &result {
                    Ok(segment) => self.notify(segment),
                    Err(e) => {
                        error!("{e}");
                        failed.store(true, Ordering::SeqCst);
                    }
                }
                Some(result)
            })
            .collect();

        collect_in_order(results)
    }
}

/// 依序號組回結果：回報序號最小的失敗；有未啟動的區間則視為中斷
fn collect_in_order(results: Vec<Option<SegmentResult<Segment>>>) -> SegmentResult<Vec<Segment>> {
    let mut segments = Vec::with_capacity(results.len());
    let mut skipped = false;

    for result in results {
        match result {
            Some(Ok(segment)) => segments.push(segment),
            Some(Err(e)) => return Err(e),
            None => skipped = true,
        }
    }

    if skipped {
        return Err(SegmentError::Cancelled {
            completed: segments.len(),
        });
    }

    Ok(segments)
}

fn create_dir(path: &Path) -> SegmentResult<()> {
    fs::create_dir_all(path).map_err(|source| SegmentError::OutputDirectory {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(index: usize) -> Segment {
        let start = (index as u64 - 1) * 8;
        Segment {
            index,
            window: TimeWindow {
                start,
                end: start + 8,
            },
            path: PathBuf::from(format!("/clips/v_{index}.mp4")),
        }
    }

    fn extraction_error(index: usize) -> SegmentError {
        SegmentError::ExtractionFailed {
            index,
            window: segment(index).window,
            diagnostic: "boom".to_string(),
        }
    }

    #[test]
    fn test_segment_naming() {
        assert_eq!(SegmentNaming::Underscore.file_name("talk", 3, "mp4"), "talk_3.mp4");
        assert_eq!(SegmentNaming::Part.file_name("talk", 3, "mp4"), "talk_part3.mp4");
    }

    #[test]
    fn test_output_layout() {
        let layout = OutputLayout::new("/srv/clips");
        assert_eq!(layout.processed_dir(), PathBuf::from("/srv/clips/processed"));

        let scoped = layout.scoped("abc");
        assert_eq!(scoped.clips_root, PathBuf::from("/srv/clips/abc"));
        assert_eq!(scoped.processed_dir(), PathBuf::from("/srv/clips/abc/processed"));

        let renamed = OutputLayout::new("/srv/clips").with_processed_dir_name("final");
        assert_eq!(renamed.processed_dir(), PathBuf::from("/srv/clips/final"));
    }

    #[test]
    fn test_collect_in_order_all_ok() {
        let segments = collect_in_order(vec![
            Some(Ok(segment(1))),
            Some(Ok(segment(2))),
            Some(Ok(segment(3))),
        ])
        .unwrap();
        let indices: Vec<usize> = segments.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_collect_in_order_reports_lowest_failure() {
        let err = collect_in_order(vec![
            Some(Ok(segment(1))),
            None,
            Some(Err(extraction_error(3))),
            Some(Err(extraction_error(4))),
        ])
        .unwrap_err();
        assert_eq!(err.failed_index(), Some(3));
    }

    #[test]
    fn test_collect_in_order_skipped_without_failure_is_cancelled() {
        let err = collect_in_order(vec![Some(Ok(segment(1))), None]).unwrap_err();
        assert!(matches!(err, SegmentError::Cancelled { completed: 1 }));
    }
}
