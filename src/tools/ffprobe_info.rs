use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
}

#[derive(Deserialize)]
struct FormatInfo {
    tags: Option<FormatTags>,
}

#[derive(Deserialize)]
struct FormatTags {
    creation_time: Option<String>,
}

/// 使用 ffprobe 取得影片容器的建立時間
///
/// 容器沒有 `creation_time` 標籤時回傳 `Ok(None)`
pub fn get_video_creation_date(path: &Path) -> Result<Option<NaiveDateTime>> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "format_tags=creation_time",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffprobe 執行失敗: {stderr}");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let probe: FfprobeOutput =
        serde_json::from_str(&stdout).with_context(|| "無法解析 ffprobe 輸出")?;

    let creation_time = probe
        .format
        .and_then(|f| f.tags)
        .and_then(|t| t.creation_time);

    let Some(raw) = creation_time else {
        return Ok(None);
    };

    parse_creation_time(&raw)
        .with_context(|| format!("無法解析 creation_time: {raw}"))
        .map(Some)
}

/// 解析 creation_time 字串
///
/// 常見兩種格式："YYYY-MM-DD HH:MM:SS" 與 RFC 3339
/// （例如 "2024-01-01T10:00:00.000000Z"）
fn parse_creation_time(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let dt = DateTime::parse_from_rfc3339(raw)?;
    Ok(dt.naive_utc())
}
