//! 稽核輸出
//!
//! 在 `CLEANED/.tmp/` 留下本次整理的痕跡：被捨棄的重複檔清單、
//! 縮時結構表、各測站的相機結構表，全部為 CSV

use crate::component::archive_organizer::record::MediaRecord;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct DroppedRow<'a> {
    file_path: &'a str,
}

#[derive(Serialize)]
struct RecordRow<'a> {
    file_path: String,
    station: &'a str,
    capture_time: String,
    file_number: Option<u32>,
    content_hash: Option<&'a str>,
    sequence: u32,
    timelapse: bool,
    planned_name: Option<&'a str>,
    planned_subdir: String,
}

impl<'a> RecordRow<'a> {
    fn from_record(record: &'a MediaRecord) -> Self {
        Self {
            file_path: record.file_path.display().to_string(),
            station: &record.station,
            capture_time: record
                .capture_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            file_number: record.file_number,
            content_hash: record.content_hash.as_deref(),
            sequence: record.sequence_number,
            timelapse: record.is_timelapse,
            planned_name: record.planned_name.as_deref(),
            planned_subdir: record
                .planned_subdir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }
}

/// 寫出被捨棄的重複檔清單（`dropped_<run_id>.csv`）
pub fn write_dropped_csv(dropped: &[PathBuf], tmp_dir: &Path, run_id: &str) -> Result<PathBuf> {
    let path = tmp_dir.join(format!("dropped_{run_id}.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("無法建立稽核檔: {}", path.display()))?;

    for file_path in dropped {
        writer.serialize(DroppedRow {
            file_path: &file_path.to_string_lossy(),
        })?;
    }
    writer.flush()?;
    Ok(path)
}

/// 寫出縮時結構表與各測站的相機結構表
pub fn write_bucket_reports(records: &[MediaRecord], tmp_dir: &Path) -> Result<()> {
    let timelapse: Vec<&MediaRecord> = records.iter().filter(|r| r.is_timelapse).collect();
    write_records_csv(&timelapse, &tmp_dir.join("structure_timelapse.csv"))?;

    let stations: BTreeSet<&str> = records
        .iter()
        .filter(|r| !r.is_timelapse)
        .map(|r| r.station.as_str())
        .collect();
    for station in stations {
        let bucket: Vec<&MediaRecord> = records
            .iter()
            .filter(|r| !r.is_timelapse && r.station == station)
            .collect();
        write_records_csv(
            &bucket,
            &tmp_dir.join(format!("structure_camera_{station}.csv")),
        )?;
    }
    Ok(())
}

fn write_records_csv(records: &[&MediaRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("無法建立稽核檔: {}", path.display()))?;
    for record in records {
        writer.serialize(RecordRow::from_record(record))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn record(station: &str, timelapse: bool) -> MediaRecord {
        let mut record = MediaRecord::new(
            PathBuf::from(format!("/data/{station}/RCNX0001.jpg")),
            station.to_string(),
        );
        record.capture_time = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0);
        record.is_timelapse = timelapse;
        record
    }

    #[test]
    fn test_write_dropped_csv() {
        let temp_dir = TempDir::new().unwrap();
        let dropped = vec![PathBuf::from("/data/bel02/RCNX0002.jpg")];

        let path = write_dropped_csv(&dropped, temp_dir.path(), "20240101000000").unwrap();
        let content = fs::read_to_string(&path).unwrap();

        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("dropped_"));
        assert!(content.contains("RCNX0002.jpg"));
    }

    #[test]
    fn test_write_bucket_reports_splits_by_station() {
        let temp_dir = TempDir::new().unwrap();
        let records = vec![
            record("bel02", false),
            record("bel03", false),
            record("bel02", true),
        ];

        write_bucket_reports(&records, temp_dir.path()).unwrap();

        assert!(temp_dir.path().join("structure_timelapse.csv").exists());
        assert!(temp_dir.path().join("structure_camera_bel02.csv").exists());
        assert!(temp_dir.path().join("structure_camera_bel03.csv").exists());

        let timelapse = fs::read_to_string(temp_dir.path().join("structure_timelapse.csv")).unwrap();
        // 只有標頭與一筆縮時紀錄
        assert_eq!(timelapse.lines().count(), 2);
    }
}
