//! 連拍序號
//!
//! 同一測站在短時間內連續觸發的拍攝視為一個連拍（burst），
//! 序號用來區分同一秒級時間戳下的多張影像

use crate::component::archive_organizer::record::MediaRecord;
use chrono::Duration;

/// 連拍視窗：與連拍第一張相距在此秒數內（含）屬於同一連拍
const BURST_WINDOW_SECONDS: i64 = 60;

/// 依拍攝時間排序並指派連拍序號
///
/// 輸入應為單一範圍（測站 × 相機/縮時桶）的紀錄。
/// 視窗基準固定在連拍的第一張（anchor），不會隨後續紀錄滑動：
/// 10:00:00、10:00:30、10:01:20 中第三張雖然距離第二張只有 50 秒，
/// 但距離 anchor 已超過 60 秒，因此開啟新連拍。
/// 沒有拍攝時間的紀錄排在最後且不參與連拍，序號維持 1
pub fn assign_sequences(records: &mut [MediaRecord]) {
    records.sort_by_key(|r| (r.capture_time.is_none(), r.capture_time));

    let mut anchor = None;
    let mut counter = 0u32;

    for record in records.iter_mut() {
        let Some(time) = record.capture_time else {
            record.sequence_number = 1;
            continue;
        };

        match anchor {
            Some(anchor_time)
                if time <= anchor_time + Duration::seconds(BURST_WINDOW_SECONDS) =>
            {
                counter += 1;
            }
            _ => {
                anchor = Some(time);
                counter = 1;
            }
        }
        record.sequence_number = counter;
    }
}
