use crate::config::Config;
use crate::tools::{build_worker_pool, hash_files, scan_media_files, validate_directory_exists};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use log::info;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 重複檔案稽核器：回報內容相同的檔案群組
pub struct DuplicateAudit {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl DuplicateAudit {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 重複檔案稽核 ===").cyan().bold());

        let input_path = self.prompt_input_path()?;
        let directory = PathBuf::from(&input_path);
        validate_directory_exists(&directory)?;

        println!("{}", style("掃描媒體檔案中...").dim());
        let mut extensions: HashSet<String> = self.config.file_type_table.image_extensions_set();
        extensions.extend(self.config.file_type_table.video_extensions_set());
        let files = scan_media_files(&directory, &extensions)?;

        if files.is_empty() {
            println!("{}", style("找不到任何媒體檔案").yellow());
            return Ok(());
        }
        println!(
            "{}",
            style(format!("找到 {} 個媒體檔案，開始計算雜湊...", files.len())).green()
        );

        let pool = build_worker_pool(self.config.settings.worker_threads)?;
        let groups = pool.install(|| find_duplicate_groups(&files, &self.shutdown_signal));

        if self.shutdown_signal.load(Ordering::SeqCst) {
            println!("{}", style("操作已取消").yellow());
            return Ok(());
        }

        self.print_report(files.len(), &groups);
        Ok(())
    }

    fn prompt_input_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入要稽核的資料夾路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn print_report(&self, total_files: usize, groups: &[Vec<PathBuf>]) {
        println!();
        println!("{}", style("=== 稽核結果 ===").cyan().bold());
        println!("  總計掃描: {total_files} 個檔案");

        if groups.is_empty() {
            println!("  {}", style("沒有發現重複檔案").green());
            return;
        }

        let redundant: usize = groups.iter().map(|g| g.len() - 1).sum();
        println!("  重複群組: {} 組", style(groups.len()).yellow());
        println!("  多餘副本: {} 個", style(redundant).yellow());
        info!("重複稽核完成: {} 組, {redundant} 個多餘副本", groups.len());

        for (i, group) in groups.iter().enumerate() {
            println!();
            println!("  群組 {}:", style(i + 1).cyan());
            for (j, path) in group.iter().enumerate() {
                let marker = if j == 0 { "保留" } else { "重複" };
                println!("    [{marker}] {}", path.display());
            }
        }
    }
}

/// 以內容雜湊將檔案分組，回傳含兩個以上成員的群組
///
/// 群組內維持輸入順序（第一筆即去重時會保留的那筆），
/// 群組之間依第一個成員的路徑排序
#[must_use]
pub fn find_duplicate_groups(files: &[PathBuf], shutdown_signal: &AtomicBool) -> Vec<Vec<PathBuf>> {
    let hashes = hash_files(files, shutdown_signal);

    let mut by_hash: HashMap<String, Vec<PathBuf>> = HashMap::new();
    for (path, hash) in files.iter().zip(hashes) {
        if let Some(hash) = hash {
            by_hash.entry(hash).or_default().push(path.clone());
        }
    }

    let mut groups: Vec<Vec<PathBuf>> = by_hash
        .into_values()
        .filter(|group| group.len() > 1)
        .collect();
    groups.sort_by(|a, b| a[0].cmp(&b[0]));
    groups
}
