use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 掃描目錄下所有符合副檔名的媒體檔案，按路徑排序
///
/// 副檔名集合須為小寫並含前導點（例如 ".jpg"）
pub fn scan_media_files(directory: &Path, extensions: &HashSet<String>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| has_extension_in(path, extensions))
        .collect();

    files.sort();
    Ok(files)
}

fn has_extension_in(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&format!(".{}", ext.to_lowercase())))
}
