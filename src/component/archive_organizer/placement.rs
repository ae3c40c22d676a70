//! 檔案搬移
//!
//! 依規劃表把檔案複製或移動到 CLEANED 資料庫；
//! 目的地已存在時跳過並記錄，絕不覆寫

use crate::component::archive_organizer::record::MediaRecord;
use crate::tools::ensure_directory_exists;
use anyhow::{Context, Result};
use chrono::Datelike;
use log::warn;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// 單筆搬移的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed,
    /// 目的地已存在同名檔案，跳過
    SkippedExisting,
    /// 紀錄沒有規劃檔名（缺拍攝時間）
    NoPlan,
}

/// 建立 CLEANED 目錄骨架：年份資料夾、timelapse、.tmp 稽核目錄
///
/// CLEANED 與來源資料夾並列（在其上層目錄中）
pub fn prepare_cleaned_structure(
    source_dir: &Path,
    records: &[MediaRecord],
) -> Result<PathBuf> {
    let parent = source_dir.parent().unwrap_or(source_dir);
    let cleaned_dir = parent.join("CLEANED");
    ensure_directory_exists(&cleaned_dir)?;

    let years: BTreeSet<i32> = records
        .iter()
        .filter_map(|r| r.capture_time)
        .map(|t| t.year())
        .collect();
    for year in years {
        ensure_directory_exists(&cleaned_dir.join(year.to_string()))?;
    }
    ensure_directory_exists(&cleaned_dir.join("timelapse"))?;
    ensure_directory_exists(&cleaned_dir.join(".tmp"))?;

    Ok(cleaned_dir)
}

/// 將單筆紀錄放進新資料庫
pub fn place_file(
    record: &MediaRecord,
    cleaned_dir: &Path,
    copy_mode: bool,
) -> Result<PlacementOutcome> {
    let (Some(name), Some(subdir)) = (&record.planned_name, &record.planned_subdir) else {
        return Ok(PlacementOutcome::NoPlan);
    };

    let target_dir = cleaned_dir.join(subdir);
    ensure_directory_exists(&target_dir)?;

    let destination = target_dir.join(name);
    if destination.exists() {
        warn!("目的地已存在，跳過: {}", destination.display());
        return Ok(PlacementOutcome::SkippedExisting);
    }

    if copy_mode {
        fs::copy(&record.file_path, &destination).with_context(|| {
            format!(
                "無法複製檔案: {} -> {}",
                record.file_path.display(),
                destination.display()
            )
        })?;
    } else {
        fs::rename(&record.file_path, &destination).with_context(|| {
            format!(
                "無法移動檔案: {} -> {}",
                record.file_path.display(),
                destination.display()
            )
        })?;
    }

    Ok(PlacementOutcome::Placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn planned_record(source: PathBuf) -> MediaRecord {
        let mut record = MediaRecord::new(source, "bel02".to_string());
        record.capture_time = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0);
        record.planned_name = Some("bel02__2024-01-01__10-00-00.jpg".to_string());
        record.planned_subdir = Some(PathBuf::from("2024").join("bel02"));
        record
    }

    #[test]
    fn test_prepare_cleaned_structure() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Herbiland");
        fs::create_dir_all(&source).unwrap();

        let record = planned_record(source.join("RCNX0001.jpg"));
        let cleaned = prepare_cleaned_structure(&source, std::slice::from_ref(&record)).unwrap();

        assert_eq!(cleaned, temp_dir.path().join("CLEANED"));
        assert!(cleaned.join("2024").is_dir());
        assert!(cleaned.join("timelapse").is_dir());
        assert!(cleaned.join(".tmp").is_dir());
    }

    #[test]
    fn test_place_file_copy_mode_keeps_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("RCNX0001.jpg");
        fs::write(&source, b"image bytes").unwrap();
        let cleaned = temp_dir.path().join("CLEANED");

        let record = planned_record(source.clone());
        let outcome = place_file(&record, &cleaned, true).unwrap();

        assert_eq!(outcome, PlacementOutcome::Placed);
        assert!(source.exists());
        let destination = cleaned
            .join("2024")
            .join("bel02")
            .join("bel02__2024-01-01__10-00-00.jpg");
        assert_eq!(fs::read(destination).unwrap(), b"image bytes");
    }

    #[test]
    fn test_place_file_move_mode_removes_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("RCNX0001.jpg");
        fs::write(&source, b"image bytes").unwrap();
        let cleaned = temp_dir.path().join("CLEANED");

        let record = planned_record(source.clone());
        let outcome = place_file(&record, &cleaned, false).unwrap();

        assert_eq!(outcome, PlacementOutcome::Placed);
        assert!(!source.exists());
    }

    #[test]
    fn test_place_file_never_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("RCNX0001.jpg");
        fs::write(&source, b"new bytes").unwrap();
        let cleaned = temp_dir.path().join("CLEANED");

        let destination_dir = cleaned.join("2024").join("bel02");
        fs::create_dir_all(&destination_dir).unwrap();
        let destination = destination_dir.join("bel02__2024-01-01__10-00-00.jpg");
        fs::write(&destination, b"original bytes").unwrap();

        let record = planned_record(source);
        let outcome = place_file(&record, &cleaned, true).unwrap();

        assert_eq!(outcome, PlacementOutcome::SkippedExisting);
        assert_eq!(fs::read(destination).unwrap(), b"original bytes");
    }

    #[test]
    fn test_place_file_without_plan_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let record = MediaRecord::new(temp_dir.path().join("x.jpg"), "bel02".to_string());
        let outcome = place_file(&record, &temp_dir.path().join("CLEANED"), true).unwrap();
        assert_eq!(outcome, PlacementOutcome::NoPlan);
    }
}
