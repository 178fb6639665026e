//! 短片產生元件
//!
//! 暫存上傳檔案 → 切割 → 後製 → 輸出結果摘要

mod main;

pub use main::ClipGenerator;
