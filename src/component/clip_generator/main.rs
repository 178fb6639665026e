use crate::config::Config;
use crate::segmentation::{
    FfmpegEngine, SegmentError, SegmentationPipeline, SegmentationResult, UploadReport,
};
use crate::tools::{StagedUpload, stage_upload, validate_clip_length, validate_file_exists};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use rust_i18n::t;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// 上傳一支影片並切成固定長度的短片
pub struct ClipGenerator {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl ClipGenerator {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style(t!("generator.title")).cyan().bold());

        let source = self.prompt_source_path()?;
        validate_file_exists(&source)?;
        let clip_length = self.prompt_clip_length()?;

        println!("{}", style(t!("generator.staging")).dim());
        let upload = stage_upload(
            &source,
            &self.config.settings.storage.upload_dir,
            self.config.settings.storage.max_upload_bytes,
        )?;
        println!(
            "{}",
            style(t!("generator.staged", path = upload.path.display())).green()
        );

        // 上傳識別碼在這裡產生，失敗時才能指出殘留片段的實際位置
        let upload_id = self
            .config
            .settings
            .storage
            .namespace_by_upload
            .then(|| Uuid::new_v4().to_string());

        println!("{}", style(t!("generator.running")).cyan());
        match self.split(&upload, clip_length, upload_id.as_deref()) {
            Ok(result) => {
                self.print_summary(&upload, clip_length, &result)?;
                Ok(())
            }
            Err(e) => {
                error!("切割失敗 {}: {e}", upload.original_name);
                eprintln!("{} {}", style(t!("generator.failed")).red().bold(), e);
                if matches!(
                    e,
                    SegmentError::ExtractionFailed { .. }
                        | SegmentError::ProcessingFailed { .. }
                        | SegmentError::Cancelled { .. }
                ) {
                    println!(
                        "{}",
                        style(t!(
                            "generator.leftover_hint",
                            path = self.clips_dir(upload_id.as_deref()).display()
                        ))
                        .yellow()
                    );
                }
                Ok(())
            }
        }
    }

    /// 這次上傳的片段所在資料夾
    fn clips_dir(&self, upload_id: Option<&str>) -> PathBuf {
        let layout = self.config.settings.output_layout();
        upload_id.map_or(layout.clips_root.clone(), |id| layout.scoped(id).clips_root)
    }

    fn prompt_source_path(&self) -> Result<PathBuf> {
        let path: String = Input::new()
            .with_prompt(t!("generator.prompt_source"))
            .interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    fn prompt_clip_length(&self) -> Result<u64> {
        let segmentation = &self.config.settings.segmentation;
        let (min, max) = (segmentation.min_clip_length, segmentation.max_clip_length);

        let value: u64 = Input::new()
            .with_prompt(t!("generator.prompt_clip_length", min = min, max = max))
            .default(segmentation.default_clip_length.clamp(min, max))
            .validate_with(|input: &u64| -> Result<(), String> {
                validate_clip_length(*input, min, max).map(|_| ()).map_err(|_| {
                    t!("generator.clip_length_invalid", min = min, max = max).to_string()
                })
            })
            .interact_text()?;

        Ok(validate_clip_length(value, min, max)?)
    }

    fn split(
        &self,
        upload: &StagedUpload,
        clip_length: u64,
        upload_id: Option<&str>,
    ) -> Result<SegmentationResult, SegmentError> {
        let settings = &self.config.settings;

        let progress_bar = ProgressBar::new(settings.segmentation.max_clips as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message(t!("generator.progress").to_string());

        // 前一次的中斷不影響這次切割
        self.shutdown_signal.store(false, Ordering::SeqCst);

        let bar = progress_bar.clone();
        let mut pipeline = SegmentationPipeline::new(
            FfmpegEngine::new(settings.segmentation.extract_mode),
            settings.output_layout(),
        )
        .with_options(settings.pipeline_options())
        .with_shutdown_signal(Arc::clone(&self.shutdown_signal))
        .on_segment(move |_segment| bar.inc(1));
        if let Some(id) = upload_id {
            pipeline = pipeline.with_upload_id(id);
        }

        let result = pipeline.run(
            &upload.path,
            clip_length,
            settings.segmentation.max_clips,
            settings.segmentation.post_processing,
        );

        match &result {
            Ok(done) => {
                progress_bar.set_length(done.count() as u64);
                progress_bar.finish();
            }
            Err(_) => progress_bar.abandon_with_message(t!("common.cancelled").to_string()),
        }

        result
    }

    fn print_summary(
        &self,
        upload: &StagedUpload,
        clip_length: u64,
        result: &SegmentationResult,
    ) -> Result<()> {
        println!();
        println!(
            "{}",
            style(t!("generator.done", count = result.count())).green().bold()
        );

        println!("\n{}", style(t!("generator.clips_header")).cyan());
        for segment in &result.segments {
            println!(
                "  {}. {} {}",
                segment.index,
                segment.file_name(),
                style(segment.window).dim()
            );
        }

        if !result.processed.is_empty() {
            println!("\n{}", style(t!("generator.processed_header")).cyan());
            for artifact in &result.processed {
                println!("  {}. {}", artifact.index, artifact.file_name());
            }
        }

        let report = UploadReport::new(
            &upload.original_name,
            &upload.path,
            clip_length,
            &self.config.settings.storage.clips_dir,
            result,
        );
        println!("\n{}", style(t!("generator.report_header")).cyan());
        println!("{}", style(report.to_json()?).dim());

        info!(
            "{} 切割完成 - 片段: {}, 後製: {}",
            upload.original_name,
            result.count(),
            result.processed.len()
        );
        Ok(())
    }
}
