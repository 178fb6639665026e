use crate::config::{Config, Language, save_settings};
use crate::menu::handlers::{run_clip_browser, run_clip_generator};
use crate::segmentation::{ExtractMode, SegmentNaming};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_generate"),
        t!("main_menu.opt_browse"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_clip_generator(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_clip_browser(term, config)?;
            Ok(true)
        }
        Some(2) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(3) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

fn on_off(value: bool) -> String {
    if value {
        t!("common.on").to_string()
    } else {
        t!("common.off").to_string()
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let settings = &config.settings;
        let options = vec![
            format!(
                "{}: {}s",
                t!("settings.opt_clip_length"),
                settings.segmentation.default_clip_length
            ),
            format!("{}: {}", t!("settings.opt_max_clips"), settings.segmentation.max_clips),
            format!("{}: {}", t!("settings.opt_naming"), settings.segmentation.naming),
            format!(
                "{}: {}",
                t!("settings.opt_extract_mode"),
                settings.segmentation.extract_mode
            ),
            format!(
                "{}: {}",
                t!("settings.opt_post_processing"),
                on_off(settings.segmentation.post_processing)
            ),
            format!(
                "{}: {}",
                t!("settings.opt_parallel"),
                on_off(settings.segmentation.parallel_extraction)
            ),
            format!(
                "{}: {}",
                t!("settings.opt_namespace"),
                on_off(settings.storage.namespace_by_upload)
            ),
            format!("{}: {}", t!("settings.opt_language"), settings.language),
            t!("settings.back").to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => edit_clip_length(config)?,
            Some(1) => edit_max_clips(config)?,
            Some(2) => {
                let choices = [SegmentNaming::Underscore, SegmentNaming::Part];
                if let Some(naming) = choose(
                    term,
                    &t!("settings.prompt_naming"),
                    &choices,
                    config.settings.segmentation.naming,
                )? {
                    config.settings.segmentation.naming = naming;
                    persist(config, naming)?;
                }
            }
            Some(3) => {
                let choices = [ExtractMode::StreamCopy, ExtractMode::Reencode];
                if let Some(mode) = choose(
                    term,
                    &t!("settings.prompt_extract_mode"),
                    &choices,
                    config.settings.segmentation.extract_mode,
                )? {
                    config.settings.segmentation.extract_mode = mode;
                    persist(config, mode)?;
                }
            }
            Some(4) => {
                let value = !config.settings.segmentation.post_processing;
                config.settings.segmentation.post_processing = value;
                persist(config, on_off(value))?;
            }
            Some(5) => {
                let value = !config.settings.segmentation.parallel_extraction;
                config.settings.segmentation.parallel_extraction = value;
                persist(config, on_off(value))?;
            }
            Some(6) => {
                let value = !config.settings.storage.namespace_by_upload;
                config.settings.storage.namespace_by_upload = value;
                persist(config, on_off(value))?;
            }
            Some(7) => show_language_menu(term, config)?,
            Some(8) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

fn persist(config: &Config, value: impl Display) -> Result<()> {
    save_settings(&config.settings)?;
    println!("\n{} {}", style(t!("settings.saved")).green(), value);
    std::thread::sleep(std::time::Duration::from_secs(1));
    Ok(())
}

/// 從固定選項中選一個，ESC 回傳 None
fn choose<T: Copy + PartialEq + Display>(
    term: &Term,
    prompt: &str,
    choices: &[T],
    current: T,
) -> Result<Option<T>> {
    let items: Vec<String> = choices.iter().map(ToString::to_string).collect();
    let default_index = choices.iter().position(|&c| c == current).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    Ok(selection
        .map(|index| choices[index])
        .filter(|&choice| choice != current))
}

fn edit_clip_length(config: &mut Config) -> Result<()> {
    let segmentation = &config.settings.segmentation;
    let (min, max) = (segmentation.min_clip_length, segmentation.max_clip_length);

    let value: u64 = Input::new()
        .with_prompt(t!("settings.prompt_clip_length"))
        .default(segmentation.default_clip_length)
        .validate_with(|input: &u64| -> Result<(), String> {
            if (min..=max).contains(input) {
                Ok(())
            } else {
                Err(t!("generator.clip_length_invalid", min = min, max = max).to_string())
            }
        })
        .interact_text()?;

    if value != config.settings.segmentation.default_clip_length {
        config.settings.segmentation.default_clip_length = value;
        persist(config, format!("{value}s"))?;
    }
    Ok(())
}

fn edit_max_clips(config: &mut Config) -> Result<()> {
    let value: usize = Input::new()
        .with_prompt(t!("settings.prompt_max_clips"))
        .default(config.settings.segmentation.max_clips)
        .validate_with(|input: &usize| -> Result<(), String> {
            if *input >= 1 {
                Ok(())
            } else {
                Err(t!("settings.max_clips_invalid").to_string())
            }
        })
        .interact_text()?;

    if value != config.settings.segmentation.max_clips {
        config.settings.segmentation.max_clips = value;
        persist(config, value)?;
    }
    Ok(())
}

/// 語言設定選單
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!("{}", style(t!("settings.language.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let languages = [Language::EnUs, Language::ZhTw];

    if let Some(selected_lang) = choose(
        term,
        &t!("settings.language.prompt"),
        &languages,
        config.settings.language,
    )? {
        config.settings.language = selected_lang;
        rust_i18n::set_locale(selected_lang.as_str());
        persist(config, selected_lang)?;
    }

    Ok(())
}
