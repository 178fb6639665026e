//! 影片切割核心
//!
//! 1. 取得影片長度（ffprobe）
//! 2. 規劃固定長度的時間區間
//! 3. 逐段擷取（ffmpeg）
//! 4. 後製（可選）

mod engine;
mod error;
mod extractor;
mod ffmpeg;
mod pipeline;
mod planner;
mod post_process;
mod prober;
mod report;

pub use engine::{EngineFailure, MediaEngine};
pub use error::{SegmentError, SegmentResult};
pub use extractor::{Segment, SegmentExtractor};
pub use ffmpeg::{ExtractMode, FfmpegCommand, FfmpegEngine};
pub use pipeline::{
    DEFAULT_PROCESSED_DIR_NAME, OutputLayout, PipelineOptions, SegmentNaming,
    SegmentationPipeline, SegmentationResult,
};
pub use planner::{TimeWindow, expected_window_count, plan_windows};
pub use post_process::{CopyProcessor, PostProcessor, ProcessedArtifact, processed_file_name};
pub use prober::{MediaProber, SourceMedia};
pub use report::{CLIPS_URL_PREFIX, UploadReport, clip_url};
