use crate::config::load::SETTINGS_FILE;
use crate::config::types::UserSettings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    save_settings_to(settings, Path::new(SETTINGS_FILE))
}

pub fn save_settings_to(settings: &UserSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{Config, Language};
    use crate::segmentation::SegmentNaming;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = UserSettings::default();
        settings.language = Language::ZhTw;
        settings.segmentation.default_clip_length = 15;
        settings.segmentation.naming = SegmentNaming::Part;
        save_settings_to(&settings, &path).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings, settings);
    }
}
