//! 資料庫整理主模組
//!
//! 協調整條管線：測站解析 → 拍攝時間擷取 → 內容去重 →
//! 時間修補 → 分類 → 連拍序號與命名 → 搬移

use super::audit;
use super::capture_time::extract_all;
use super::classifier::{TimelapseRule, classify};
use super::correspondence::{CorrespondenceTable, resolve_station};
use super::deduplicator::{DeduplicationOutcome, deduplicate};
use super::naming::plan_records;
use super::patcher::{TimestampPatch, load_patches, patch_area};
use super::placement::{PlacementOutcome, place_file, prepare_cleaned_structure};
use super::record::MediaRecord;
use crate::config::save::{add_recent_path, save_settings};
use crate::config::{Config, MediaCategory};
use crate::tools::{build_worker_pool, scan_media_files, validate_directory_exists};
use anyhow::{Context, Result};
use chrono::Local;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 紅外線相機資料庫整理器
pub struct ArchiveOrganizer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

/// 搬移結果統計
#[derive(Debug, Default)]
struct PlacementStats {
    placed: usize,
    skipped: usize,
    unplanned: usize,
    errors: usize,
}

impl ArchiveOrganizer {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 整理紅外線相機資料庫 ===").cyan().bold());

        let Some(input_path) = self.prompt_input_path()? else {
            return Ok(()); // ESC pressed
        };
        let directory = PathBuf::from(&input_path);
        validate_directory_exists(&directory)?;
        // 測站解析依賴絕對路徑元件
        let directory = fs::canonicalize(&directory)
            .with_context(|| format!("無法解析路徑: {}", directory.display()))?;

        // 更新路徑歷史並儲存
        {
            let mut settings = self.config.settings.clone();
            add_recent_path(&mut settings, &input_path);
            if let Err(e) = save_settings(&settings) {
                warn!("無法儲存路徑歷史: {e}");
            }
        }

        let Some(category) = self.prompt_media_category()? else {
            return Ok(());
        };
        let correspondence = self.prompt_correspondence_table()?;
        let patches = self.prompt_patches()?;

        println!("{}", style("掃描媒體檔案中...").dim());
        let extensions = self.config.file_type_table.extensions_for(category);
        let files = scan_media_files(&directory, &extensions)?;

        if files.is_empty() {
            println!("{}", style("找不到任何媒體檔案").yellow());
            return Ok(());
        }
        println!(
            "{}",
            style(format!("找到 {} 個媒體檔案", files.len())).green()
        );

        let pool = build_worker_pool(self.config.settings.worker_threads)?;

        // 1. 測站解析（循序，整表一致）
        println!("{}", style("1. 解析測站名稱...").cyan());
        let mut records: Vec<MediaRecord> = files
            .into_iter()
            .map(|path| {
                let station = resolve_station(&path, correspondence.as_ref());
                MediaRecord::new(path, station)
            })
            .collect();

        // 2. 拍攝時間（平行）
        println!("{}", style("2. 擷取拍攝時間...").cyan());
        let spinner = stage_spinner("擷取中繼資料中...");
        extract_all(
            &mut records,
            &self.config.file_type_table,
            &pool,
            &self.shutdown_signal,
        );
        spinner.finish_and_clear();
        if self.cancelled() {
            return Ok(());
        }

        let missing = records.iter().filter(|r| r.capture_time.is_none()).count();
        if missing > 0 {
            println!(
                "{}",
                style(format!("警告：{missing} 個檔案沒有拍攝時間，將不納入搬移")).yellow()
            );
        }

        // 3. 內容去重（平行雜湊 + 循序挑選）
        println!("{}", style("3. 內容去重...").cyan());
        let spinner = stage_spinner("計算內容雜湊中...");
        let DeduplicationOutcome { survivors, dropped } =
            deduplicate(records, &pool, &self.shutdown_signal);
        spinner.finish_and_clear();
        if self.cancelled() {
            return Ok(());
        }
        let mut records = survivors;
        println!(
            "{}",
            style(format!("發現 {} 個重複檔案", dropped.len())).green()
        );

        // 4. 時間修補（依操作者指定順序）
        if patches.is_empty() {
            println!("{}", style("4. 沒有要修補的測站").dim());
        } else {
            println!("{}", style("4. 套用時間修補...").cyan());
            for patch in &patches {
                match patch_area(&mut records, patch) {
                    Ok(count) => {
                        info!("測站 {} 修補了 {count} 筆紀錄", patch.area);
                        println!(
                            "  {}",
                            style(format!("{}: 修正 {count} 筆", patch.area)).green()
                        );
                    }
                    Err(e) => {
                        // 單筆修補失敗不中斷整理
                        warn!("修補失敗: {e}");
                        eprintln!("  {} {}", style("修補失敗:").red().bold(), e);
                    }
                }
            }
        }

        // 5. 分類縮時與相機影像
        println!("{}", style("5. 分類縮時與相機影像...").cyan());
        let rule = correspondence
            .as_ref()
            .and_then(CorrespondenceTable::timelapse_schedule)
            .map_or(TimelapseRule::HalfHourGrid, TimelapseRule::Schedule);
        classify(&mut records, &rule);

        // 6. 連拍序號與新檔名（依測站 × 桶分組）
        println!("{}", style("6. 指派連拍序號與新檔名...").cyan());
        let records = plan_records(records);

        // 建立目錄骨架與稽核輸出
        let cleaned_dir = prepare_cleaned_structure(&directory, &records)?;
        let tmp_dir = cleaned_dir.join(".tmp");
        let run_id = Local::now().format("%Y%m%d%H%M%S").to_string();
        audit::write_dropped_csv(&dropped, &tmp_dir, &run_id)?;
        audit::write_bucket_reports(&records, &tmp_dir)?;

        self.display_preview(&records, &cleaned_dir, dropped.len());

        if !self.confirm_placement()? {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        // 7. 搬移
        let stats = self.execute_placement(&records, &cleaned_dir);
        self.display_summary(&stats, &cleaned_dir);

        Ok(())
    }

    fn cancelled(&self) -> bool {
        if self.shutdown_signal.load(Ordering::SeqCst) {
            println!("{}", style("操作已取消").yellow());
            return true;
        }
        false
    }

    fn prompt_input_path(&self) -> Result<Option<String>> {
        let recent_paths = &self.config.settings.recent_paths;

        if recent_paths.is_empty() {
            let path: String = Input::new()
                .with_prompt("請輸入要整理的資料夾路徑")
                .interact_text()?;
            return Ok(Some(path.trim().to_string()));
        }

        let mut options: Vec<String> = recent_paths
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let exists = Path::new(p).exists();
                let indicator = if exists { "✓" } else { "✗" };
                format!("{} [{}] {}", i + 1, indicator, p)
            })
            .collect();
        options.push("輸入新路徑...".to_string());

        println!("{}", style("(按 ESC 返回主選單)").dim());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇路徑")
            .items(&options)
            .default(0)
            .interact_opt()?;

        match selection {
            None => Ok(None),
            Some(index) if index < recent_paths.len() => Ok(Some(recent_paths[index].clone())),
            Some(_) => {
                let path: String = Input::new()
                    .with_prompt("請輸入要整理的資料夾路徑")
                    .interact_text()?;
                Ok(Some(path.trim().to_string()))
            }
        }
    }

    fn prompt_media_category(&self) -> Result<Option<MediaCategory>> {
        let options = vec!["影像（jpg / png / tiff...）", "影片（avi / mov / mp4）"];
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇要整理的媒體類別")
            .items(&options)
            .default(0)
            .interact_opt()?;

        Ok(match selection {
            Some(0) => Some(MediaCategory::Image),
            Some(1) => Some(MediaCategory::Video),
            _ => None,
        })
    }

    /// 對應表缺漏可接受（退回資料夾名稱），格式錯誤則中止整理
    fn prompt_correspondence_table(&self) -> Result<Option<CorrespondenceTable>> {
        let path: String = Input::new()
            .with_prompt("測站對應表 CSV 路徑（留空表示不使用）")
            .allow_empty(true)
            .interact_text()?;
        let path = path.trim();

        if path.is_empty() {
            println!("{}", style("不使用對應表，測站名稱取自資料夾").dim());
            return Ok(None);
        }

        let table = CorrespondenceTable::load_from_csv(Path::new(path))
            .with_context(|| format!("載入對應表失敗: {path}"))?;
        Ok(Some(table))
    }

    fn prompt_patches(&self) -> Result<Vec<TimestampPatch>> {
        let path: String = Input::new()
            .with_prompt("時間修補設定 JSON 路徑（留空表示不修補）")
            .allow_empty(true)
            .interact_text()?;
        let path = path.trim();

        if path.is_empty() {
            return Ok(Vec::new());
        }
        load_patches(Path::new(path))
    }

    fn confirm_placement(&self) -> Result<bool> {
        let action = if self.config.settings.copy_mode {
            "複製"
        } else {
            "移動"
        };
        let confirmed = Confirm::new()
            .with_prompt(format!("確定要{action}檔案到新資料庫嗎？"))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn display_preview(&self, records: &[MediaRecord], cleaned_dir: &Path, dropped: usize) {
        let timelapse = records.iter().filter(|r| r.is_timelapse).count();
        let planned = records.iter().filter(|r| r.planned_name.is_some()).count();

        println!();
        println!("{}", style("=== 整理規劃 ===").cyan().bold());
        println!("  目標資料庫: {}", cleaned_dir.display());
        println!("  紀錄總數: {} 筆", records.len());
        println!("  縮時影像: {} 筆", style(timelapse).cyan());
        println!("  相機影像: {} 筆", style(records.len() - timelapse).cyan());
        println!("  可搬移: {} 筆", style(planned).green());
        if planned < records.len() {
            println!(
                "  缺拍攝時間: {} 筆",
                style(records.len() - planned).yellow()
            );
        }
        if dropped > 0 {
            println!("  已捨棄重複: {} 筆", style(dropped).yellow());
        }
        println!();
    }

    fn execute_placement(&self, records: &[MediaRecord], cleaned_dir: &Path) -> PlacementStats {
        let mut stats = PlacementStats::default();

        let progress_bar = ProgressBar::new(records.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message("搬移中...");

        for record in records {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                break;
            }

            match place_file(record, cleaned_dir, self.config.settings.copy_mode) {
                Ok(PlacementOutcome::Placed) => stats.placed += 1,
                Ok(PlacementOutcome::SkippedExisting) => stats.skipped += 1,
                Ok(PlacementOutcome::NoPlan) => stats.unplanned += 1,
                Err(e) => {
                    error!("搬移失敗 {}: {e}", record.file_path.display());
                    stats.errors += 1;
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
        stats
    }

    fn display_summary(&self, stats: &PlacementStats, cleaned_dir: &Path) {
        println!();
        println!("{}", style("=== 整理結果 ===").cyan().bold());
        println!("  成功: {} 個", style(stats.placed).green());
        if stats.skipped > 0 {
            println!("  已存在跳過: {} 個", style(stats.skipped).yellow());
        }
        if stats.unplanned > 0 {
            println!("  缺拍攝時間未搬移: {} 個", style(stats.unplanned).yellow());
        }
        if stats.errors > 0 {
            println!("  失敗: {} 個", style(stats.errors).red());
        }
        println!();
        println!(
            "{}",
            style(format!("稽核檔案位於 {}", cleaned_dir.join(".tmp").display())).dim()
        );
    }
}

fn stage_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("Invalid progress bar template"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
