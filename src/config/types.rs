use crate::segmentation::{
    DEFAULT_PROCESSED_DIR_NAME, ExtractMode, OutputLayout, PipelineOptions, SegmentNaming,
};
use crate::tools::MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_CLIP_LENGTH: u64 = 8;
pub const MIN_CLIP_LENGTH: u64 = 3;
pub const MAX_CLIP_LENGTH: u64 = 60;
pub const DEFAULT_MAX_CLIPS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 切割相關設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationSettings {
    /// 預設片段長度（秒）
    pub default_clip_length: u64,
    pub min_clip_length: u64,
    pub max_clip_length: u64,
    /// 單次上傳最多產生的片段數，超過的部分直接捨棄
    pub max_clips: usize,
    pub naming: SegmentNaming,
    pub extract_mode: ExtractMode,
    pub post_processing: bool,
    pub parallel_extraction: bool,
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            default_clip_length: DEFAULT_CLIP_LENGTH,
            min_clip_length: MIN_CLIP_LENGTH,
            max_clip_length: MAX_CLIP_LENGTH,
            max_clips: DEFAULT_MAX_CLIPS,
            naming: SegmentNaming::default(),
            extract_mode: ExtractMode::default(),
            post_processing: true,
            parallel_extraction: false,
        }
    }
}

/// 檔案存放位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub upload_dir: PathBuf,
    pub clips_dir: PathBuf,
    pub processed_dir_name: String,
    pub max_upload_bytes: u64,
    /// 每次上傳使用獨立子資料夾，避免同名檔案互相覆蓋
    pub namespace_by_upload: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            clips_dir: PathBuf::from("clips"),
            processed_dir_name: DEFAULT_PROCESSED_DIR_NAME.to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            namespace_by_upload: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub segmentation: SegmentationSettings,
    pub storage: StorageSettings,
}

impl UserSettings {
    #[must_use]
    pub fn output_layout(&self) -> OutputLayout {
        OutputLayout::new(&self.storage.clips_dir)
            .with_processed_dir_name(&self.storage.processed_dir_name)
    }

    #[must_use]
    pub const fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            naming: self.segmentation.naming,
            parallel: self.segmentation.parallel_extraction,
            namespace_by_upload: self.storage.namespace_by_upload,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}
