//! 切割流程的錯誤類型

use super::planner::TimeWindow;
use std::path::PathBuf;
use thiserror::Error;

pub type SegmentResult<T> = Result<T, SegmentError>;

/// 單次上傳切割失敗的原因
///
/// 每個變體都帶有發生錯誤的階段資訊（路徑、片段編號、時間區間），
/// 外部工具的診斷訊息原樣保留。
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("來源檔案不存在或無法讀取: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("無法取得影片長度 {}: {diagnostic}", path.display())]
    ProbeFailed { path: PathBuf, diagnostic: String },

    #[error("影片長度無效 ({duration}s): {}", path.display())]
    InvalidDuration { path: PathBuf, duration: f64 },

    #[error("擷取片段 {index} ({window}) 失敗: {diagnostic}")]
    ExtractionFailed {
        index: usize,
        window: TimeWindow,
        diagnostic: String,
    },

    #[error("後製片段 {index} 失敗: {diagnostic}")]
    ProcessingFailed { index: usize, diagnostic: String },

    #[error("無法建立輸出資料夾 {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("操作已取消（已完成 {completed} 個片段）")]
    Cancelled { completed: usize },
}

impl SegmentError {
    /// 失敗片段的編號（僅擷取與後製階段有值）
    #[must_use]
    pub const fn failed_index(&self) -> Option<usize> {
        match self {
            Self::ExtractionFailed { index, .. } | Self::ProcessingFailed { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}
