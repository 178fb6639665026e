use super::pipeline::SegmentationResult;
use serde::Serialize;
use std::path::{Component, Path};

pub const CLIPS_URL_PREFIX: &str = "/clips";

/// 回報給呼叫端的上傳摘要
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub message: String,
    pub filename: String,
    pub saved_to: String,
    pub clip_length: u64,
    pub num_clips: usize,
    pub clips: Vec<String>,
    pub processed_clips: Vec<String>,
    pub clip_urls: Vec<String>,
    pub processed_clip_urls: Vec<String>,
}

impl UploadReport {
    /// `clips_root` 為未加上傳識別碼前的片段根目錄，用來產生 `/clips/...` 網址
    #[must_use]
    pub fn new(
        filename: &str,
        saved_to: &Path,
        clip_length: u64,
        clips_root: &Path,
        result: &SegmentationResult,
    ) -> Self {
        let clips = result
            .segments
            .iter()
            .map(|s| s.path.display().to_string())
            .collect();
        let processed_clips = result
            .processed
            .iter()
            .map(|p| p.path.display().to_string())
            .collect();

        Self {
            message: "Upload successful + clips generated".to_string(),
            filename: filename.to_string(),
            saved_to: saved_to.display().to_string(),
            clip_length,
            num_clips: result.count(),
            clips,
            processed_clips,
            clip_urls: result
                .segments
                .iter()
                .map(|s| clip_url(clips_root, &s.path))
                .collect(),
            processed_clip_urls: result
                .processed
                .iter()
                .map(|p| clip_url(clips_root, &p.path))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// 將片段根目錄下的檔案路徑轉成 `/clips/<相對路徑>`
#[must_use]
pub fn clip_url(clips_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(clips_root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    format!("{CLIPS_URL_PREFIX}/{}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::extractor::Segment;
    use crate::segmentation::planner::TimeWindow;
    use crate::segmentation::post_process::ProcessedArtifact;
    use std::path::PathBuf;

    #[test]
    fn test_clip_url() {
        let root = Path::new("/srv/clips");
        assert_eq!(
            clip_url(root, Path::new("/srv/clips/talk_1.mp4")),
            "/clips/talk_1.mp4"
        );
        assert_eq!(
            clip_url(root, Path::new("/srv/clips/processed/talk_1_processed.mp4")),
            "/clips/processed/talk_1_processed.mp4"
        );
        assert_eq!(
            clip_url(root, Path::new("/srv/clips/3f2a/talk_1.mp4")),
            "/clips/3f2a/talk_1.mp4"
        );
    }

    #[test]
    fn test_report_json_fields() {
        let result = SegmentationResult {
            upload_id: None,
            source: PathBuf::from("/srv/uploads/talk.mp4"),
            duration_seconds: 12.0,
            clips_dir: PathBuf::from("/srv/clips"),
            processed_dir: PathBuf::from("/srv/clips/processed"),
            segments: vec![Segment {
                index: 1,
                window: TimeWindow { start: 0, end: 8 },
                path: PathBuf::from("/srv/clips/talk_1.mp4"),
            }],
            processed: vec![ProcessedArtifact {
                index: 1,
                path: PathBuf::from("/srv/clips/processed/talk_1_processed.mp4"),
            }],
        };

        let report = UploadReport::new(
            "talk.mp4",
            Path::new("/srv/uploads/talk.mp4"),
            8,
            Path::new("/srv/clips"),
            &result,
        );
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["num_clips"], 1);
        assert_eq!(value["clip_length"], 8);
        assert_eq!(value["clip_urls"][0], "/clips/talk_1.mp4");
        assert_eq!(
            value["processed_clip_urls"][0],
            "/clips/processed/talk_1_processed.mp4"
        );
    }
}
