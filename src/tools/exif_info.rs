use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// 讀取影像的 EXIF 拍攝時間（`DateTimeOriginal`，次選 `DateTime`）
///
/// 檔案沒有 EXIF 區塊或缺少日期欄位時回傳 `Ok(None)`；
/// 只有檔案本身無法開啟時才回傳錯誤
pub fn read_exif_capture_time(path: &Path) -> Result<Option<NaiveDateTime>> {
    let file = File::open(path).with_context(|| format!("無法開啟檔案: {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let Ok(exif_data) = Reader::new().read_from_container(&mut reader) else {
        // 沒有 EXIF 或格式不支援
        return Ok(None);
    };

    let datetime_field = exif_data
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .or_else(|| exif_data.get_field(Tag::DateTime, In::PRIMARY));

    let Some(field) = datetime_field else {
        return Ok(None);
    };

    Ok(ascii_value(&field.value).and_then(|s| parse_exif_datetime(&s)))
}

fn ascii_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(vec) => vec.first().map(|ascii_val| {
            String::from_utf8_lossy(ascii_val)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        }),
        _ => None,
    }
}

/// 解析 EXIF 日期字串（格式 "YYYY:MM:DD HH:MM:SS"）
fn parse_exif_datetime(datetime_str: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y:%m:%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
