use crate::config::types::{MAX_RECENT_PATHS, UserSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    // Save to settings.json in the current working directory
    let path = Path::new("settings.json");
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// 更新最近使用的路徑
/// 將新路徑加入最前面，去重並限制數量
pub fn add_recent_path(settings: &mut UserSettings, path: &str) {
    settings.recent_paths.retain(|p| p != path);
    settings.recent_paths.insert(0, path.to_string());
    settings.recent_paths.truncate(MAX_RECENT_PATHS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_recent_path_deduplicates_and_truncates() {
        let mut settings = UserSettings::default();
        for i in 0..(MAX_RECENT_PATHS + 2) {
            add_recent_path(&mut settings, &format!("/data/run{i}"));
        }
        assert_eq!(settings.recent_paths.len(), MAX_RECENT_PATHS);

        // 重複路徑移到最前面而不是新增
        let existing = settings.recent_paths[2].clone();
        add_recent_path(&mut settings, &existing);
        assert_eq!(settings.recent_paths[0], existing);
        assert_eq!(settings.recent_paths.len(), MAX_RECENT_PATHS);
    }
}
