pub mod load;
pub mod save;
pub mod types;

pub use load::SETTINGS_FILE;
pub use save::{save_settings, save_settings_to};
pub use types::{
    Config, DEFAULT_CLIP_LENGTH, DEFAULT_MAX_CLIPS, Language, MAX_CLIP_LENGTH, MIN_CLIP_LENGTH,
    SegmentationSettings, StorageSettings, UserSettings,
};
