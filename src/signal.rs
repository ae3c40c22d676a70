use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 建立 Ctrl-C 中斷旗標
///
/// 平行階段在檔案之間輪詢這個旗標，收到中斷後不再開始新檔案
#[must_use]
pub fn setup_shutdown_signal() -> Arc<AtomicBool> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        signal_clone.store(true, Ordering::SeqCst);
        warn!("收到中斷信號");
        eprintln!("\n收到中斷信號，處理完目前檔案後停止...");
    })
    .expect("無法設定 Ctrl-C 處理器");

    shutdown_signal
}
