//! 功能元件模組
//!
//! 每個子模組對應主選單的一個功能

pub mod clip_browser;
pub mod clip_generator;

pub use clip_browser::ClipBrowser;
pub use clip_generator::ClipGenerator;
