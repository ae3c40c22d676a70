use anyhow::{Context, Result};
use log::info;
use sysinfo::System;

/// 偵測系統 CPU 核心數，偵測不到時退回 1
#[must_use]
pub fn detected_core_count() -> usize {
    let system = System::new_all();
    system.cpus().len().max(1)
}

/// 建立有界的平行工作池
///
/// `worker_threads` 為 0 時使用全部偵測到的核心
pub fn build_worker_pool(worker_threads: usize) -> Result<rayon::ThreadPool> {
    let num_threads = if worker_threads == 0 {
        detected_core_count()
    } else {
        worker_threads
    };

    info!("建立工作池: {num_threads} 個執行緒");

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("無法建立工作池")
}
