//! 測站對應表與測站名稱解析
//!
//! 對應表支援兩種欄位結構，載入時自動偵測並選定解析策略：
//! - 直接對應：`current_name` → `replacement_name`
//! - 生命週期：`station`、`running`（Y/N）、`move_to`，
//!   可選的 `timelapse` 欄位帶有各測站的縮時排程

use crate::tools::path_components;
use log::warn;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

/// 原始資料根目錄的哨兵名稱（RAW → 區域 → 測站）
const RAW_ROOT_MARKER: &str = "RAW";

static REGEX_NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-]").expect("Invalid regex"));

#[derive(Debug, Error)]
pub enum CorrespondenceError {
    #[error("無法讀取對應表 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("對應表解析失敗: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "無法辨識的對應表欄位結構，需要 (current_name, replacement_name) 或 (station, running, move_to)"
    )]
    UnrecognizedShape,
}

/// 正規化測站名稱：移除空白與連字號並轉小寫
///
/// "Bel-02"、"bel 02"、"BEL02" 正規化後相等
#[must_use]
pub fn normalize_station_name(name: &str) -> String {
    REGEX_NAME_SEPARATORS
        .replace_all(&name.to_lowercase(), "")
        .into_owned()
}

#[derive(Debug, Clone)]
pub struct DirectEntry {
    pub current_name: String,
    pub replacement_name: String,
}

#[derive(Debug, Clone)]
pub struct LifecycleEntry {
    pub station: String,
    pub running: bool,
    pub move_to: Option<String>,
    /// 縮時排程的 24 小時制整點，`None` 表示該站不拍縮時
    pub timelapse_hour: Option<u32>,
}

/// 測站對應表，載入時即選定其中一種策略
#[derive(Debug, Clone)]
pub enum CorrespondenceTable {
    Direct(Vec<DirectEntry>),
    Lifecycle(Vec<LifecycleEntry>),
}

impl CorrespondenceTable {
    /// 從 CSV 檔載入，分隔符號（`;` 或 `,`）依標頭列自動偵測
    pub fn load_from_csv(path: &Path) -> Result<Self, CorrespondenceError> {
        let content = std::fs::read_to_string(path).map_err(|source| CorrespondenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_csv(&content)
    }

    fn parse_csv(content: &str) -> Result<Self, CorrespondenceError> {
        let delimiter = if content.lines().next().is_some_and(|line| line.contains(';')) {
            b';'
        } else {
            b','
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let column = |name: &str| headers.iter().position(|h| h == name);

        if let (Some(current_idx), Some(replacement_idx)) =
            (column("current_name"), column("replacement_name"))
        {
            let mut entries = Vec::new();
            for row in reader.records() {
                let row = row?;
                let current = row.get(current_idx).unwrap_or_default().to_string();
                let replacement = row.get(replacement_idx).unwrap_or_default().to_string();
                if current.is_empty() || replacement.is_empty() {
                    continue;
                }
                entries.push(DirectEntry {
                    current_name: current,
                    replacement_name: replacement,
                });
            }
            return Ok(Self::Direct(entries));
        }

        if let Some(station_idx) = column("station") {
            let running_idx = column("running");
            let move_to_idx = column("move_to");
            let timelapse_idx = column("timelapse");

            let mut entries = Vec::new();
            for row in reader.records() {
                let row = row?;
                let station = row.get(station_idx).unwrap_or_default().to_string();
                if station.is_empty() {
                    continue;
                }
                let running = running_idx
                    .and_then(|i| row.get(i))
                    .is_some_and(|v| v.eq_ignore_ascii_case("y"));
                let move_to = move_to_idx
                    .and_then(|i| row.get(i))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from);
                let timelapse_hour = timelapse_idx
                    .and_then(|i| row.get(i))
                    .and_then(parse_schedule_token);
                entries.push(LifecycleEntry {
                    station,
                    running,
                    move_to,
                    timelapse_hour,
                });
            }
            return Ok(Self::Lifecycle(entries));
        }

        Err(CorrespondenceError::UnrecognizedShape)
    }

    /// 主要欄位比對：依序測試每個路徑元件
    fn match_primary(&self, components: &[String]) -> Option<String> {
        for comp in components {
            let normalized = normalize_station_name(comp);
            match self {
                Self::Direct(entries) => {
                    if let Some(entry) = entries
                        .iter()
                        .find(|e| normalize_station_name(&e.current_name) == normalized)
                    {
                        return Some(entry.replacement_name.clone());
                    }
                }
                Self::Lifecycle(entries) => {
                    if let Some(entry) = entries
                        .iter()
                        .find(|e| normalize_station_name(&e.station) == normalized)
                    {
                        // 停用的測站轉導到接替站
                        if !entry.running {
                            if let Some(move_to) = &entry.move_to {
                                return Some(move_to.clone());
                            }
                        }
                        return Some(entry.station.clone());
                    }
                }
            }
        }
        None
    }

    /// 次要比對：路徑已用新名稱整理過的情況
    fn match_secondary(&self, components: &[String]) -> Option<String> {
        let Self::Direct(entries) = self else {
            // 生命週期表的 station 欄位已在主要比對涵蓋
            return None;
        };
        for comp in components {
            let normalized = normalize_station_name(comp);
            if let Some(entry) = entries
                .iter()
                .find(|e| normalize_station_name(&e.replacement_name) == normalized)
            {
                return Some(entry.replacement_name.clone());
            }
        }
        None
    }

    /// 各測站的縮時排程（正規化站名 → 24 小時制整點）
    ///
    /// 表中完全沒有排程資訊時回傳 `None`，分類器改用預設的半小時規則
    #[must_use]
    pub fn timelapse_schedule(&self) -> Option<HashMap<String, u32>> {
        let Self::Lifecycle(entries) = self else {
            return None;
        };
        let schedule: HashMap<String, u32> = entries
            .iter()
            .filter_map(|e| {
                e.timelapse_hour
                    .map(|hour| (normalize_station_name(resolved_name(e)), hour))
            })
            .collect();
        if schedule.is_empty() {
            None
        } else {
            Some(schedule)
        }
    }
}

/// 生命週期條目解析後代表的測站名稱
fn resolved_name(entry: &LifecycleEntry) -> &str {
    if !entry.running {
        if let Some(move_to) = &entry.move_to {
            return move_to;
        }
    }
    &entry.station
}

/// 解析排程代號（"9am"、"2pm"）為 24 小時制整點
///
/// 空字串與 none 哨兵回傳 `None`；看不懂的代號記錄警告後視同沒有排程
fn parse_schedule_token(token: &str) -> Option<u32> {
    let token = token.trim().to_lowercase();
    if token.is_empty() || token == "none" || token == "no" {
        return None;
    }

    let (digits, offset) = if let Some(rest) = token.strip_suffix("am") {
        (rest.trim(), 0u32)
    } else if let Some(rest) = token.strip_suffix("pm") {
        (rest.trim(), 12u32)
    } else {
        warn!("無法解析縮時排程代號: {token}");
        return None;
    };

    let hour: u32 = match digits.parse() {
        Ok(h) if (1..=12).contains(&h) => h,
        _ => {
            warn!("無法解析縮時排程代號: {token}");
            return None;
        }
    };

    // 12am → 0、12pm → 12
    Some((hour % 12) + offset)
}

/// 將檔案路徑解析為測站名稱
///
/// 沒有對應表時直接取上層資料夾名稱；有對應表時依序嘗試
/// 主要比對、次要比對，最後退回結構推斷（每次退回都記錄警告）
#[must_use]
pub fn resolve_station(file_path: &Path, table: Option<&CorrespondenceTable>) -> String {
    let components = path_components(file_path);

    let Some(table) = table else {
        return parent_directory_name(&components, file_path);
    };

    if let Some(station) = table.match_primary(&components) {
        return station;
    }
    if let Some(station) = table.match_secondary(&components) {
        return station;
    }

    fallback_station(&components, file_path)
}

/// 結構推斷：找到 RAW 哨兵元件後往下兩層（RAW → 區域 → 測站），
/// 沒有這種結構時取上層資料夾名稱
fn fallback_station(components: &[String], file_path: &Path) -> String {
    for (i, comp) in components.iter().enumerate() {
        if comp == RAW_ROOT_MARKER && i + 2 < components.len() {
            let station = components[i + 2].clone();
            warn!(
                "對應表查無 {}，改用資料夾名稱: {station}",
                file_path.display()
            );
            return station;
        }
    }
    let station = parent_directory_name(components, file_path);
    warn!(
        "對應表查無 {}，改用資料夾名稱: {station}",
        file_path.display()
    );
    station
}

fn parent_directory_name(components: &[String], file_path: &Path) -> String {
    if components.len() >= 2 {
        components[components.len() - 2].clone()
    } else {
        warn!("無法取得上層資料夾名稱: {}", file_path.display());
        "unknown".to_string()
    }
}
