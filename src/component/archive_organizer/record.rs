use chrono::NaiveDateTime;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static REGEX_RECONYX_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RCNX(\d{4})").expect("Invalid regex"));

/// 單一媒體檔案在整理管線中的完整狀態，每個來源檔一筆
///
/// `file_path` 是不變的主鍵；其餘欄位由各管線階段依序填入
#[derive(Debug, Clone)]
pub struct MediaRecord {
    pub file_path: PathBuf,
    /// 解析後的測站名稱，解析階段之後必定非空
    pub station: String,
    /// 拍攝時間；`None` 表示中繼資料擷取失敗或格式不支援
    pub capture_time: Option<NaiveDateTime>,
    /// Reconyx 檔名（RCNXnnnn）中的流水號，供修補篩選使用
    pub file_number: Option<u32>,
    /// BLAKE3 內容雜湊，由去重階段填入
    pub content_hash: Option<String>,
    /// 連拍序號，預設 1，每個新連拍重置
    pub sequence_number: u32,
    pub is_timelapse: bool,
    /// 規劃的新檔名；沒有拍攝時間的紀錄保持 `None`
    pub planned_name: Option<String>,
    /// 規劃的目標子目錄（`<年份>/<測站>` 或 `timelapse/<測站>`）
    pub planned_subdir: Option<PathBuf>,
}

impl MediaRecord {
    #[must_use]
    pub fn new(file_path: PathBuf, station: String) -> Self {
        let file_number = parse_file_number(&file_path);
        Self {
            file_path,
            station,
            capture_time: None,
            file_number,
            content_hash: None,
            sequence_number: 1,
            is_timelapse: false,
            planned_name: None,
            planned_subdir: None,
        }
    }

    /// 小寫副檔名（含前導點），沒有副檔名時回傳空字串
    #[must_use]
    pub fn extension_lowercase(&self) -> String {
        self.file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default()
    }
}

/// 從 Reconyx 式檔名解析流水號
fn parse_file_number(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    REGEX_RECONYX_NUMBER
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
