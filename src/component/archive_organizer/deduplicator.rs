//! 內容去重
//!
//! 以 BLAKE3 內容雜湊辨識位元相同的重複檔；保留表中第一筆，
//! 其餘列入捨棄清單供稽核（本階段不刪除任何磁碟檔案）

use crate::component::archive_organizer::record::MediaRecord;
use crate::tools::hash_files;
use log::{info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

/// 去重結果：存活紀錄與被捨棄的重複檔路徑
#[derive(Debug)]
pub struct DeduplicationOutcome {
    pub survivors: Vec<MediaRecord>,
    pub dropped: Vec<PathBuf>,
}

/// 去除內容重複的紀錄
///
/// 雜湊計算平行化且保持輸入順序；挑選存活者則是循序的
/// 「第一筆獲勝」，確保同樣輸入永遠得到同樣結果。
/// 無法計算雜湊的紀錄視為唯一而保留（`content_hash` 維持 `None`）
pub fn deduplicate(
    records: Vec<MediaRecord>,
    pool: &rayon::ThreadPool,
    shutdown_signal: &AtomicBool,
) -> DeduplicationOutcome {
    let paths: Vec<PathBuf> = records.iter().map(|r| r.file_path.clone()).collect();
    let hashes = pool.install(|| hash_files(&paths, shutdown_signal));

    let mut seen: HashSet<String> = HashSet::new();
    let mut survivors = Vec::with_capacity(records.len());
    let mut dropped = Vec::new();

    for (mut record, hash) in records.into_iter().zip(hashes) {
        match hash {
            Some(hash) => {
                if seen.insert(hash.clone()) {
                    record.content_hash = Some(hash);
                    survivors.push(record);
                } else {
                    info!("捨棄重複檔案: {}", record.file_path.display());
                    dropped.push(record.file_path);
                }
            }
            None => {
                warn!(
                    "無法計算內容雜湊，保留紀錄: {}",
                    record.file_path.display()
                );
                survivors.push(record);
            }
        }
    }

    DeduplicationOutcome { survivors, dropped }
}
