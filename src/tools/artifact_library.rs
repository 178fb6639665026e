//! 已產生片段的列表與查詢

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use walkdir::WalkDir;

/// `<stem>_<n>`、`<stem>_part<n>`，後面可接 `_processed`
static REGEX_SEGMENT_INDEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<stem>.+?)_(?:part)?(?P<index>\d+)(?:_processed)?$").expect("Invalid regex")
});

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("找不到檔案: {0}")]
    NotFound(String),

    #[error("無法讀取資料夾 {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    /// 從檔名解析出的片段序號
    pub index: Option<usize>,
}

/// 解析檔名中的 (stem, 序號)
#[must_use]
pub fn parse_segment_name(file_stem: &str) -> Option<(String, usize)> {
    let caps = REGEX_SEGMENT_INDEX.captures(file_stem)?;
    let index = caps.name("index")?.as_str().parse().ok()?;
    Some((caps.name("stem")?.as_str().to_string(), index))
}

/// 列出資料夾（不含子資料夾）內指定副檔名的檔案
///
/// 依 stem、片段序號排序，讓 `talk_10` 排在 `talk_9` 後面。
/// 資料夾不存在時回傳空列表。
pub fn list_artifacts(
    directory: &Path,
    extension: &str,
) -> Result<Vec<ArtifactEntry>, LibraryError> {
    if !directory.exists() {
        return Ok(Vec::new());
    }

    let wanted = extension.trim_start_matches('.').to_lowercase();
    let mut entries = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| LibraryError::Io {
            path: directory.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let matches_ext = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().to_lowercase() == wanted);
        if !matches_ext {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let index = path
            .file_stem()
            .and_then(|s| parse_segment_name(&s.to_string_lossy()))
            .map(|(_, index)| index);

        entries.push(ArtifactEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.into_path(),
            size,
            index,
        });
    }

    entries.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    Ok(entries)
}

fn sort_key(entry: &ArtifactEntry) -> (String, usize, String) {
    let stem = Path::new(&entry.name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match parse_segment_name(&stem) {
        Some((base, index)) => (base, index, entry.name.clone()),
        None => (stem, 0, entry.name.clone()),
    }
}

/// 依檔名取得檔案路徑，不存在或名稱含路徑成分時回傳 NotFound
pub fn resolve_artifact(directory: &Path, name: &str) -> Result<PathBuf, LibraryError> {
    let mut components = Path::new(name).components();
    let is_plain_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !is_plain_name {
        return Err(LibraryError::NotFound(name.to_string()));
    }

    let path = directory.join(name);
    if !path.is_file() {
        return Err(LibraryError::NotFound(name.to_string()));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_segment_name() {
        assert_eq!(parse_segment_name("talk_3"), Some(("talk".to_string(), 3)));
        assert_eq!(parse_segment_name("talk_part12"), Some(("talk".to_string(), 12)));
        assert_eq!(
            parse_segment_name("my_talk_2_processed"),
            Some(("my_talk".to_string(), 2))
        );
        assert_eq!(parse_segment_name("talk"), None);
    }

    #[test]
    fn test_list_artifacts_sorted_by_index() {
        let dir = TempDir::new().unwrap();
        for name in ["talk_10.mp4", "talk_2.mp4", "talk_1.mp4", "notes.txt", "TALK_3.MP4"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("processed")).unwrap();
        fs::write(dir.path().join("processed").join("talk_1_processed.mp4"), b"x").unwrap();

        let entries = list_artifacts(dir.path(), "mp4").unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["TALK_3.MP4", "talk_1.mp4", "talk_2.mp4", "talk_10.mp4"]);
        assert_eq!(entries[3].index, Some(10));
    }

    #[test]
    fn test_list_artifacts_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(list_artifacts(&dir.path().join("nope"), "mp4").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_artifact() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("talk_1.mp4"), b"x").unwrap();

        assert_eq!(
            resolve_artifact(dir.path(), "talk_1.mp4").unwrap(),
            dir.path().join("talk_1.mp4")
        );
        assert!(matches!(
            resolve_artifact(dir.path(), "talk_9.mp4"),
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            resolve_artifact(dir.path(), "../talk_1.mp4"),
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(
            resolve_artifact(dir.path(), "sub/talk_1.mp4"),
            Err(LibraryError::NotFound(_))
        ));
    }
}
