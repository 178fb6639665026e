//! 已產生短片的瀏覽與查詢

mod main;

pub use main::ClipBrowser;
