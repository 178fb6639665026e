//! 時間區間規劃
//!
//! 純函式，不做任何 I/O：由左至右貪婪切割，最後一段可能較短，
//! 超過 `max_clips` 的部分直接捨棄。

use std::fmt;

/// 半開區間 `[start, end)`，單位為整數秒
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub start: u64,
    pub end: u64,
}

impl TimeWindow {
    #[must_use]
    pub const fn length(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}s, {}s)", self.start, self.end)
    }
}

/// 規劃切割區間
///
/// 任一參數為 0 時回傳空列表。
#[must_use]
pub fn plan_windows(duration: u64, clip_length: u64, max_clips: usize) -> Vec<TimeWindow> {
    if duration == 0 || clip_length == 0 || max_clips == 0 {
        return Vec::new();
    }

    let mut windows = Vec::with_capacity(expected_window_count(duration, clip_length, max_clips));
    let mut start = 0;

    while start < duration && windows.len() < max_clips {
        let end = start.saturating_add(clip_length).min(duration);
        windows.push(TimeWindow { start, end });
        start = end;
    }

    windows
}

/// `min(ceil(duration / clip_length), max_clips)`
#[must_use]
pub fn expected_window_count(duration: u64, clip_length: u64, max_clips: usize) -> usize {
    if clip_length == 0 {
        return 0;
    }
    let full = usize::try_from(duration.div_ceil(clip_length)).unwrap_or(usize::MAX);
    full.min(max_clips)
}
