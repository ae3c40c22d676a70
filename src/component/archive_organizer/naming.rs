//! 檔名與目標位置規劃
//!
//! 新檔名格式：`<測站>__YYYY-MM-DD__HH-MM-SS<副檔名>`，
//! 需要時在副檔名前插入連拍序號 `(n)` 以免撞名

use crate::component::archive_organizer::record::MediaRecord;
use crate::component::archive_organizer::sequencer::assign_sequences;
use chrono::{Datelike, NaiveDateTime};
use log::info;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// 對整張紀錄表做連拍序號與命名規劃
///
/// 依（測站, 縮時/相機）分桶，每桶獨立排序、指派序號、規劃檔名；
/// 桶以 `BTreeMap` 走訪，輸出順序對同樣輸入永遠一致
#[must_use]
pub fn plan_records(records: Vec<MediaRecord>) -> Vec<MediaRecord> {
    let mut buckets: BTreeMap<(String, bool), Vec<MediaRecord>> = BTreeMap::new();
    for record in records {
        buckets
            .entry((record.station.clone(), record.is_timelapse))
            .or_default()
            .push(record);
    }

    let mut planned = Vec::new();
    for (_, mut bucket) in buckets {
        assign_sequences(&mut bucket);
        plan_names(&mut bucket);
        planned.extend(bucket);
    }
    planned
}

/// 為單一範圍（測站 × 相機/縮時桶）內的紀錄計算新檔名與目標子目錄
///
/// 輸入必須已由序號階段依拍攝時間排序。同一連拍的成員共用連拍
/// 第一張的時間戳作為檔名時間，以序號後綴區分：10:00:00 與
/// 10:00:30 的連拍命名為 `..10-00-00.jpg` 與 `..10-00-00(2).jpg`。
/// 序號 1 只有在同一拍攝時間只有一筆時才省略後綴。
/// 沒有拍攝時間的紀錄不取得檔名，之後不納入搬移
pub fn plan_names(records: &mut [MediaRecord]) {
    let mut timestamp_counts: HashMap<NaiveDateTime, usize> = HashMap::new();
    for record in records.iter() {
        if let Some(time) = record.capture_time {
            *timestamp_counts.entry(time).or_default() += 1;
        }
    }

    let mut anchor: Option<NaiveDateTime> = None;
    for record in records.iter_mut() {
        let Some(time) = record.capture_time else {
            info!("沒有拍攝時間，不納入搬移: {}", record.file_path.display());
            record.planned_name = None;
            record.planned_subdir = None;
            continue;
        };

        if record.sequence_number == 1 {
            anchor = Some(time);
        }
        let name_time = anchor.unwrap_or(time);

        let extension = record.extension_lowercase();
        let base = format!(
            "{}__{}",
            record.station,
            name_time.format("%Y-%m-%d__%H-%M-%S")
        );
        let needs_suffix = record.sequence_number > 1
            || timestamp_counts.get(&time).copied().unwrap_or(0) > 1;

        record.planned_name = Some(if needs_suffix {
            format!("{base}({}){extension}", record.sequence_number)
        } else {
            format!("{base}{extension}")
        });

        record.planned_subdir = Some(if record.is_timelapse {
            PathBuf::from("timelapse").join(&record.station)
        } else {
            PathBuf::from(name_time.year().to_string()).join(&record.station)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::archive_organizer::sequencer::assign_sequences;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn time(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record(name: &str, capture_time: Option<NaiveDateTime>) -> MediaRecord {
        let mut record = MediaRecord::new(
            PathBuf::from(format!("/data/bel02/{name}")),
            "bel02".to_string(),
        );
        record.capture_time = capture_time;
        record
    }

    #[test]
    fn test_planned_names_for_burst() {
        let mut records = vec![
            record("RCNX0001.jpg", Some(time(10, 0, 0))),
            record("RCNX0002.jpg", Some(time(10, 0, 30))),
            record("RCNX0003.jpg", Some(time(10, 2, 0))),
        ];
        assign_sequences(&mut records);
        plan_names(&mut records);

        assert_eq!(
            records[0].planned_name.as_deref(),
            Some("bel02__2024-01-01__10-00-00.jpg")
        );
        assert_eq!(
            records[1].planned_name.as_deref(),
            Some("bel02__2024-01-01__10-00-00(2).jpg")
        );
        assert_eq!(
            records[2].planned_name.as_deref(),
            Some("bel02__2024-01-01__10-02-00.jpg")
        );
    }

    #[test]
    fn test_identical_timestamps_both_suffixed() {
        let mut records = vec![
            record("RCNX0001.jpg", Some(time(10, 0, 0))),
            record("RCNX0002.jpg", Some(time(10, 0, 0))),
        ];
        assign_sequences(&mut records);
        plan_names(&mut records);

        // 同一秒兩筆：序號 1 也要加後綴，檔名才不會重複
        let names: HashSet<_> = records
            .iter()
            .map(|r| r.planned_name.clone().unwrap())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains("bel02__2024-01-01__10-00-00(1).jpg"));
        assert!(names.contains("bel02__2024-01-01__10-00-00(2).jpg"));
    }

    #[test]
    fn test_camera_subdir_is_year_station() {
        let mut records = vec![record("RCNX0001.jpg", Some(time(10, 31, 0)))];
        plan_names(&mut records);
        assert_eq!(
            records[0].planned_subdir,
            Some(PathBuf::from("2024").join("bel02"))
        );
    }

    #[test]
    fn test_timelapse_subdir() {
        let mut records = vec![record("RCNX0001.jpg", Some(time(10, 30, 0)))];
        records[0].is_timelapse = true;
        plan_names(&mut records);
        assert_eq!(
            records[0].planned_subdir,
            Some(PathBuf::from("timelapse").join("bel02"))
        );
    }

    #[test]
    fn test_no_capture_time_gets_no_plan() {
        let mut records = vec![record("IMG_0001.jpg", None)];
        plan_names(&mut records);
        assert!(records[0].planned_name.is_none());
        assert!(records[0].planned_subdir.is_none());
    }

    #[test]
    fn test_plan_records_buckets_stations_independently() {
        let mut other = record("RCNX0001.jpg", Some(time(10, 0, 20)));
        other.station = "vercors01".to_string();
        let records = vec![
            record("RCNX0001.jpg", Some(time(10, 0, 0))),
            other,
            record("RCNX0002.jpg", Some(time(10, 0, 40))),
        ];

        let planned = plan_records(records);

        // 各測站獨立編連拍序號，不會互相延續
        let bel: Vec<_> = planned.iter().filter(|r| r.station == "bel02").collect();
        let vercors: Vec<_> = planned.iter().filter(|r| r.station == "vercors01").collect();
        assert_eq!(bel.iter().map(|r| r.sequence_number).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(vercors[0].sequence_number, 1);
        assert_eq!(
            vercors[0].planned_name.as_deref(),
            Some("vercors01__2024-01-01__10-00-20.jpg")
        );
    }

    #[test]
    fn test_extension_preserved_lowercase() {
        let mut records = vec![record("RCNX0001.AVI", Some(time(8, 15, 2)))];
        plan_names(&mut records);
        assert_eq!(
            records[0].planned_name.as_deref(),
            Some("bel02__2024-01-01__08-15-02.avi")
        );
    }
}
