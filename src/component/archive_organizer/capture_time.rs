//! 拍攝時間擷取
//!
//! 影像讀 EXIF 的拍攝標籤，影片委派給 ffprobe 探測器；
//! 任何失敗都降級為 `None` 並記錄警告，絕不中斷整批處理

use crate::component::archive_organizer::record::MediaRecord;
use crate::config::FileTypeTable;
use crate::tools::{get_video_creation_date, read_exif_capture_time};
use chrono::NaiveDateTime;
use log::warn;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// 檔案類型，依副檔名判斷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Video,
    Unsupported,
}

impl FileKind {
    #[must_use]
    pub fn from_path(path: &Path, table: &FileTypeTable) -> Self {
        if table.is_image_file(path) {
            Self::Image
        } else if table.is_video_file(path) {
            Self::Video
        } else {
            Self::Unsupported
        }
    }
}

/// 擷取單一檔案的拍攝時間
pub fn extract_capture_time(path: &Path, kind: FileKind) -> Option<NaiveDateTime> {
    match kind {
        FileKind::Image => match read_exif_capture_time(path) {
            Ok(Some(time)) => Some(time),
            Ok(None) => {
                warn!("找不到 EXIF 拍攝時間: {}", path.display());
                None
            }
            Err(e) => {
                warn!("讀取 EXIF 失敗 {}: {e}", path.display());
                None
            }
        },
        FileKind::Video => match get_video_creation_date(path) {
            Ok(Some(time)) => Some(time),
            Ok(None) => {
                warn!("影片容器沒有建立時間: {}", path.display());
                None
            }
            Err(e) => {
                warn!("讀取影片中繼資料失敗 {}: {e}", path.display());
                None
            }
        },
        FileKind::Unsupported => {
            warn!("不支援的檔案類型: {}", path.display());
            None
        }
    }
}

/// 平行擷取整批紀錄的拍攝時間
///
/// fan-out / fan-in：結果依輸入順序收齊後才寫回紀錄表，
/// 後續階段看不到部分完成的狀態
pub fn extract_all(
    records: &mut [MediaRecord],
    table: &FileTypeTable,
    pool: &rayon::ThreadPool,
    shutdown_signal: &AtomicBool,
) {
    let times: Vec<Option<NaiveDateTime>> = pool.install(|| {
        records
            .par_iter()
            .map(|record| {
                if shutdown_signal.load(Ordering::SeqCst) {
                    return None;
                }
                let kind = FileKind::from_path(&record.file_path, table);
                extract_capture_time(&record.file_path, kind)
            })
            .collect()
    });

    for (record, time) in records.iter_mut().zip(times) {
        record.capture_time = time;
    }
}
