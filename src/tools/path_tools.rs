use anyhow::{Result, bail};
use std::path::{Component, Path};

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// 將路徑拆解為一般元件（不含根目錄與磁碟代號），依路徑順序排列
#[must_use]
pub fn path_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|comp| match comp {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_path_components_skips_root() {
        let components = path_components(Path::new("/data/RAW/BELLEDONNE/bel02/RCNX0001.jpg"));
        assert_eq!(
            components,
            vec!["data", "RAW", "BELLEDONNE", "bel02", "RCNX0001.jpg"]
        );
    }

    #[test]
    fn test_validate_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_directory_exists(temp_dir.path()).is_ok());
        assert!(validate_directory_exists(&PathBuf::from("/nonexistent/dir")).is_err());
    }

    #[test]
    fn test_validate_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("f.txt");
        std::fs::write(&file_path, b"x").unwrap();
        assert!(validate_directory_exists(&file_path).is_err());
    }

    #[test]
    fn test_ensure_directory_exists_creates_nested() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b/c");
        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
