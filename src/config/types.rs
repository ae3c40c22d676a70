use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

pub const MAX_RECENT_PATHS: usize = 5;

/// 檔案類型表：各媒體類別對應的副檔名清單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "IMAGE_FILE")]
    pub image_file: Vec<String>,
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn image_extensions_set(&self) -> HashSet<String> {
        self.image_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    /// 取得指定媒體類別的副檔名集合
    #[must_use]
    pub fn extensions_for(&self, category: MediaCategory) -> HashSet<String> {
        match category {
            MediaCategory::Image => self.image_extensions_set(),
            MediaCategory::Video => self.video_extensions_set(),
        }
    }

    #[must_use]
    pub fn is_image_file(&self, path: &Path) -> bool {
        Self::has_extension_in(path, &self.image_extensions_set())
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        Self::has_extension_in(path, &self.video_extensions_set())
    }

    fn has_extension_in(path: &Path, extensions: &HashSet<String>) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 要處理的媒體類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaCategory {
    Image,
    Video,
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "影像"),
            Self::Video => write!(f, "影片"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 使用者設定，持久化於 settings.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default = "default_language")]
    pub language: Language,
    /// 平行工作執行緒數量，0 表示使用全部核心
    #[serde(default)]
    pub worker_threads: usize,
    /// true = 複製檔案到新資料庫；false = 移動
    #[serde(default = "default_copy_mode")]
    pub copy_mode: bool,
    #[serde(default)]
    pub recent_paths: Vec<String>,
}

const fn default_language() -> Language {
    Language::EnUs
}

const fn default_copy_mode() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            worker_threads: 0,
            copy_mode: default_copy_mode(),
            recent_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn sample_table() -> FileTypeTable {
        FileTypeTable {
            image_file: vec![".jpg".to_string(), ".png".to_string()],
            video_file: vec![".avi".to_string(), ".mp4".to_string()],
        }
    }

    #[test]
    fn test_is_image_file_case_insensitive() {
        let table = sample_table();
        assert!(table.is_image_file(Path::new("/data/RCNX0001.JPG")));
        assert!(table.is_image_file(Path::new("/data/photo.png")));
        assert!(!table.is_image_file(Path::new("/data/clip.avi")));
    }

    #[test]
    fn test_is_video_file() {
        let table = sample_table();
        assert!(table.is_video_file(Path::new("/data/clip.AVI")));
        assert!(!table.is_video_file(Path::new("/data/photo.jpg")));
        assert!(!table.is_video_file(Path::new("/data/noext")));
    }

    #[test]
    fn test_extensions_for_category() {
        let table = sample_table();
        assert!(table.extensions_for(MediaCategory::Image).contains(".jpg"));
        assert!(table.extensions_for(MediaCategory::Video).contains(".mp4"));
    }
}
