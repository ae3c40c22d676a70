use crate::config::save::save_settings;
use crate::config::types::{Config, Language};
use crate::menu::handlers::{run_archive_organizer, run_duplicate_audit};
use crate::tools::detected_core_count;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use rust_i18n::t;
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
        t!("main_menu.opt_organize"),
        t!("main_menu.opt_dup_audit"),
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
            run_archive_organizer(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_duplicate_audit(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(2) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(3) => Ok(false),
        None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style(t!("settings.title")).cyan().bold());
        println!("{}", style(t!("common.esc_hint")).dim());

        let options = vec![
            t!("settings.opt_workers"),
            t!("settings.opt_copy_mode"),
            t!("settings.opt_language"),
            t!("settings.back"),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => show_worker_threads_menu(term, config)?,
            Some(1) => show_copy_mode_menu(term, config)?,
            Some(2) => show_language_menu(term, config)?,
            Some(3) | None => break, // ESC or back
            _ => unreachable!(),
        }
    }

    Ok(())
}

/// 工作執行緒設定
fn show_worker_threads_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    println!(
        "{} {}",
        style(t!("settings.workers_detected")).dim(),
        detected_core_count()
    );

    let threads: usize = Input::new()
        .with_prompt(t!("settings.workers_prompt").to_string())
        .default(config.settings.worker_threads)
        .interact_text()?;

    config.settings.worker_threads = threads;
    save_settings(&config.settings)?;
    println!("{}", style(t!("settings.saved")).green());
    Ok(())
}

/// 搬移模式設定（複製或移動）
fn show_copy_mode_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    let options = vec![t!("settings.copy_mode_copy"), t!("settings.copy_mode_move")];
    let default_index = usize::from(!config.settings.copy_mode);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .items(&options)
        .default(default_index)
        .interact_on_opt(term)?;

    if let Some(index) = selection {
        config.settings.copy_mode = index == 0;
        save_settings(&config.settings)?;
        println!("{}", style(t!("settings.saved")).green());
    }
    Ok(())
}

/// 語言設定
fn show_language_menu(term: &Term, config: &mut Config) -> Result<()> {
    term.clear_screen()?;

    let languages = [Language::EnUs, Language::ZhTw];
    let options: Vec<String> = languages.iter().map(ToString::to_string).collect();
    let default_index = languages
        .iter()
        .position(|l| *l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language_prompt"))
        .items(&options)
        .default(default_index)
        .interact_on_opt(term)?;

    if let Some(index) = selection {
        config.settings.language = languages[index];
        rust_i18n::set_locale(config.settings.language.as_str());
        save_settings(&config.settings)?;
        println!("{}", style(t!("settings.saved")).green());
    }
    Ok(())
}
