//! 外部媒體引擎介面
//!
//! 切割流程只透過這兩個操作與 ffprobe / ffmpeg 溝通，
//! 測試時可換成回傳固定結果的假引擎。

use super::planner::TimeWindow;
use std::path::Path;
use thiserror::Error;

/// 外部引擎回報的失敗，`diagnostic` 為原始的 stderr 或錯誤文字
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{diagnostic}")]
pub struct EngineFailure {
    pub diagnostic: String,
}

impl EngineFailure {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }
}

pub trait MediaEngine: Send + Sync {
    /// 取得格式層級的 duration 原始輸出（尚未解析）
    fn probe(&self, source: &Path) -> Result<String, EngineFailure>;

    /// 將 `window` 範圍的內容寫入 `destination`
    fn extract(
        &self,
        source: &Path,
        window: TimeWindow,
        destination: &Path,
    ) -> Result<(), EngineFailure>;
}

impl<E: MediaEngine + ?Sized> MediaEngine for &E {
    fn probe(&self, source: &Path) -> Result<String, EngineFailure> {
        (**self).probe(source)
    }

    fn extract(
        &self,
        source: &Path,
        window: TimeWindow,
        destination: &Path,
    ) -> Result<(), EngineFailure> {
        (**self).extract(source, window, destination)
    }
}
