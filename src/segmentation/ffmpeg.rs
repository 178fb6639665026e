use super::engine::{EngineFailure, MediaEngine};
use super::planner::TimeWindow;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// 片段擷取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// 直接複製串流，速度快，切點落在最近的關鍵幀
    #[default]
    StreamCopy,
    /// 重新編碼為 H.264 / AAC，切點精準
    Reencode,
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamCopy => write!(f, "stream copy"),
            Self::Reencode => write!(f, "re-encode (H.264/AAC)"),
        }
    }
}

/// ffmpeg 單一區間擷取命令
pub struct FfmpegCommand {
    source_path: PathBuf,
    window: TimeWindow,
    destination_path: PathBuf,
    mode: ExtractMode,
}

impl FfmpegCommand {
    #[must_use]
    pub fn new(
        source_path: &Path,
        window: TimeWindow,
        destination_path: &Path,
        mode: ExtractMode,
    ) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            window,
            destination_path: destination_path.to_path_buf(),
            mode,
        }
    }

    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "-hide_banner",
            "-nostdin",
            "-loglevel",
            "error",
            "-y",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        // -ss 在 -i 前：直接跳到起點附近，不必解碼前段
        args.extend([
            "-ss".to_string(),
            self.window.start.to_string(),
            "-i".to_string(),
            self.source_path.to_string_lossy().to_string(),
            "-t".to_string(),
            self.window.length().to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "0:a:0?".to_string(),
            "-map_chapters".to_string(),
            "-1".to_string(),
        ]);

        match self.mode {
            ExtractMode::StreamCopy => {
                args.extend(["-c", "copy", "-avoid_negative_ts", "make_zero"].map(String::from));
            }
            ExtractMode::Reencode => {
                args.extend(
                    [
                        "-c:v", "libx264", "-preset", "veryfast", "-crf", "20", "-pix_fmt",
                        "yuv420p", "-c:a", "aac", "-b:a", "128k", "-movflags", "+faststart",
                    ]
                    .map(String::from),
                );
            }
        }

        args.push(self.destination_path.to_string_lossy().to_string());
        args
    }

    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(self.args());
        cmd
    }
}

/// 以系統上的 ffprobe / ffmpeg 實作的媒體引擎
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegEngine {
    mode: ExtractMode,
}

impl FfmpegEngine {
    #[must_use]
    pub const fn new(mode: ExtractMode) -> Self {
        Self { mode }
    }

    fn run(program: &str, mut command: Command) -> Result<Output, EngineFailure> {
        let output = command
            .output()
            .map_err(|e| EngineFailure::new(format!("無法執行 {program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stderr.trim().is_empty() {
                format!("{program} 異常結束: {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(EngineFailure::new(diagnostic));
        }

        Ok(output)
    }
}

impl MediaEngine for FfmpegEngine {
    fn probe(&self, source: &Path) -> Result<String, EngineFailure> {
        let mut command = Command::new("ffprobe");
        command
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(source);

        debug!("執行 ffprobe: {}", source.display());
        let output = Self::run("ffprobe", command)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn extract(
        &self,
        source: &Path,
        window: TimeWindow,
        destination: &Path,
    ) -> Result<(), EngineFailure> {
        let ffmpeg = FfmpegCommand::new(source, window, destination, self.mode);
        debug!("執行 ffmpeg {}", ffmpeg.args().join(" "));
        Self::run("ffmpeg", ffmpeg.build_command())?;
        Ok(())
    }
}
