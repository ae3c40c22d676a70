//! 縮時 / 相機觸發分類
//!
//! 預設規則：秒為 0 且分鐘為 0 或 30（固定半小時網格）即視為縮時。
//! 提供各測站排程時，改為分鐘為 0 且小時等於該站設定的整點

use crate::component::archive_organizer::correspondence::normalize_station_name;
use crate::component::archive_organizer::record::MediaRecord;
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashMap;

/// 縮時判定規則
#[derive(Debug, Clone)]
pub enum TimelapseRule {
    /// 固定半小時網格
    HalfHourGrid,
    /// 各測站排程：正規化站名 → 24 小時制整點
    Schedule(HashMap<String, u32>),
}

impl TimelapseRule {
    fn is_timelapse(&self, station: &str, time: NaiveDateTime) -> bool {
        match self {
            Self::HalfHourGrid => {
                time.second() == 0 && (time.minute() == 0 || time.minute() == 30)
            }
            Self::Schedule(schedule) => schedule
                .get(&normalize_station_name(station))
                .is_some_and(|&hour| time.minute() == 0 && time.hour() == hour),
        }
    }
}

/// 為每筆紀錄設定 `is_timelapse`，分割必為完全且互斥
///
/// 沒有拍攝時間的紀錄一律歸為相機觸發
pub fn classify(records: &mut [MediaRecord], rule: &TimelapseRule) {
    for record in records.iter_mut() {
        record.is_timelapse = record
            .capture_time
            .is_some_and(|time| rule.is_timelapse(&record.station, time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn time(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record(station: &str, capture_time: Option<NaiveDateTime>) -> MediaRecord {
        let mut record = MediaRecord::new(PathBuf::from("/data/x.jpg"), station.to_string());
        record.capture_time = capture_time;
        record
    }

    #[test]
    fn test_half_hour_grid() {
        let mut records = vec![
            record("bel02", Some(time(14, 30, 0))),
            record("bel02", Some(time(14, 0, 0))),
            record("bel02", Some(time(14, 31, 0))),
            record("bel02", Some(time(14, 30, 5))),
        ];
        classify(&mut records, &TimelapseRule::HalfHourGrid);

        assert!(records[0].is_timelapse);
        assert!(records[1].is_timelapse);
        assert!(!records[2].is_timelapse);
        // 秒不為 0 不算縮時
        assert!(!records[3].is_timelapse);
    }

    #[test]
    fn test_schedule_rule_matches_station_hour() {
        let schedule: HashMap<String, u32> =
            [("bel02".to_string(), 9), ("vercors01".to_string(), 14)]
                .into_iter()
                .collect();
        let rule = TimelapseRule::Schedule(schedule);

        let mut records = vec![
            record("Bel-02", Some(time(9, 0, 0))),
            record("Bel-02", Some(time(14, 0, 0))),
            record("vercors 01", Some(time(14, 0, 30))),
            record("unlisted", Some(time(9, 0, 0))),
        ];
        classify(&mut records, &rule);

        // 站名經過正規化比對
        assert!(records[0].is_timelapse);
        assert!(!records[1].is_timelapse);
        // 排程規則只要求分鐘為 0
        assert!(records[2].is_timelapse);
        // 沒有排程的測站永不分類為縮時
        assert!(!records[3].is_timelapse);
    }

    #[test]
    fn test_split_is_exhaustive_and_disjoint() {
        let mut records = vec![
            record("bel02", Some(time(10, 30, 0))),
            record("bel02", Some(time(10, 31, 0))),
            record("bel02", None),
        ];
        classify(&mut records, &TimelapseRule::HalfHourGrid);

        let timelapse = records.iter().filter(|r| r.is_timelapse).count();
        let camera = records.iter().filter(|r| !r.is_timelapse).count();
        assert_eq!(timelapse + camera, records.len());
        // 無時間戳 → 相機觸發
        assert!(!records[2].is_timelapse);
    }
}
