use crate::config::Config;
use crate::tools::{ArtifactEntry, LibraryError, list_artifacts, resolve_artifact};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use rust_i18n::t;
use std::path::Path;

const CLIP_EXTENSION: &str = "mp4";

pub struct ClipBrowser {
    config: Config,
}

impl ClipBrowser {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style(t!("browser.title")).cyan().bold());

        let layout = self.config.settings.output_layout();
        let clips = list_artifacts(&layout.clips_root, CLIP_EXTENSION)?;
        let processed_dir = layout.processed_dir();
        let processed = list_artifacts(&processed_dir, CLIP_EXTENSION)?;

        println!(
            "\n{}",
            style(t!("browser.clips_header", path = layout.clips_root.display())).cyan()
        );
        Self::print_entries(&clips);

        println!(
            "\n{}",
            style(t!("browser.processed_header", path = processed_dir.display())).cyan()
        );
        Self::print_entries(&processed);

        let name: String = Input::new()
            .with_prompt(t!("browser.prompt_lookup"))
            .allow_empty(true)
            .interact_text()?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }

        self.lookup(name, &[&layout.clips_root, &processed_dir])
    }

    fn print_entries(entries: &[ArtifactEntry]) {
        if entries.is_empty() {
            println!("  {}", style(t!("browser.empty")).yellow());
            return;
        }

        for entry in entries {
            let size_mb = entry.size as f64 / 1024.0 / 1024.0;
            println!("  {} ({:.2} MB)", entry.name, size_mb);
        }
    }

    fn lookup(&self, name: &str, directories: &[&Path]) -> Result<()> {
        for directory in directories {
            match resolve_artifact(directory, name) {
                Ok(path) => {
                    let size = std::fs::metadata(&path)?.len();
                    println!(
                        "{}",
                        style(t!("browser.found", path = path.display(), size = size)).green()
                    );
                    return Ok(());
                }
                Err(LibraryError::NotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        println!("{}", style(t!("browser.not_found", name = name)).red());
        Ok(())
    }
}
