//! 時間修補
//!
//! 相機時鐘漂移或設錯時，操作者指定一個已知正確時間的參考檔，
//! 以整天為單位計算偏移量，套用到篩選出的紀錄子集

use crate::component::archive_organizer::record::MediaRecord;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("修補篩選條件在測站 {area} 沒有選到任何紀錄")]
    EmptySelection { area: String },
    #[error("找不到參考檔案（樣式 \"{pattern}\"）")]
    ReferenceNotFound { pattern: String },
    #[error("參考檔案樣式 \"{pattern}\" 匹配到 {count} 筆，必須唯一")]
    ReferenceAmbiguous { pattern: String, count: usize },
    #[error("參考檔案沒有拍攝時間: {path}")]
    ReferenceMissingTimestamp { path: String },
}

/// 宣告式篩選條件，描述要修補哪些紀錄
///
/// 可從修補設定檔（JSON）反序列化，例如：
/// `{"AnyOf": [{"PathContains": "(2)"}, {"FileNumberBetween": [131, 141]}]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PatchFilter {
    /// 選取測站內全部紀錄
    All,
    PathContains(String),
    CapturedBefore(NaiveDateTime),
    CapturedAfter(NaiveDateTime),
    /// 含上下界；沒有流水號的紀錄不會被選中
    FileNumberBetween(u32, u32),
    Not(Box<PatchFilter>),
    AllOf(Vec<PatchFilter>),
    AnyOf(Vec<PatchFilter>),
}

impl PatchFilter {
    #[must_use]
    pub fn matches(&self, record: &MediaRecord) -> bool {
        match self {
            Self::All => true,
            Self::PathContains(needle) => {
                record.file_path.to_string_lossy().contains(needle.as_str())
            }
            Self::CapturedBefore(bound) => record.capture_time.is_some_and(|t| t < *bound),
            Self::CapturedAfter(bound) => record.capture_time.is_some_and(|t| t > *bound),
            Self::FileNumberBetween(min, max) => record
                .file_number
                .is_some_and(|n| (*min..=*max).contains(&n)),
            Self::Not(inner) => !inner.matches(record),
            Self::AllOf(filters) => filters.iter().all(|f| f.matches(record)),
            Self::AnyOf(filters) => filters.iter().any(|f| f.matches(record)),
        }
    }
}

/// 一筆修補操作
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampPatch {
    /// 要修補的測站名稱
    pub area: String,
    /// 參考檔案的路徑片段，必須唯一匹配
    pub reference_pattern: String,
    /// 參考檔案的正確拍攝時間
    pub correct_time: NaiveDateTime,
    pub filter: PatchFilter,
}

/// 從 JSON 檔載入修補清單，依檔案內順序套用
pub fn load_patches(path: &Path) -> Result<Vec<TimestampPatch>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("無法讀取修補設定: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("無法解析修補設定: {}", path.display()))
}

/// 對單一測站套用時間修補，回傳被修正的筆數
///
/// 驗證失敗（參考檔不唯一、篩選為空）時不更動任何紀錄
pub fn patch_area(records: &mut [MediaRecord], patch: &TimestampPatch) -> Result<usize, PatchError> {
    let selected: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.station == patch.area && patch.filter.matches(r))
        .map(|(i, _)| i)
        .collect();

    if selected.is_empty() {
        return Err(PatchError::EmptySelection {
            area: patch.area.clone(),
        });
    }

    let references: Vec<usize> = selected
        .iter()
        .copied()
        .filter(|&i| {
            records[i]
                .file_path
                .to_string_lossy()
                .contains(&patch.reference_pattern)
        })
        .collect();

    let reference_index = match references.as_slice() {
        [] => {
            return Err(PatchError::ReferenceNotFound {
                pattern: patch.reference_pattern.clone(),
            });
        }
        [index] => *index,
        _ => {
            return Err(PatchError::ReferenceAmbiguous {
                pattern: patch.reference_pattern.clone(),
                count: references.len(),
            });
        }
    };

    let reference_time = records[reference_index].capture_time.ok_or_else(|| {
        PatchError::ReferenceMissingTimestamp {
            path: records[reference_index].file_path.display().to_string(),
        }
    })?;

    // 以整天為單位的偏移量
    let delta = Duration::days((patch.correct_time - reference_time).num_days());

    let mut patched = 0usize;
    for index in selected {
        if let Some(time) = records[index].capture_time {
            records[index].capture_time = Some(time + delta);
            patched += 1;
        }
    }

    Ok(patched)
}
