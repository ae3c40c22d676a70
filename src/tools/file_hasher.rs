use anyhow::{Context, Result};
use log::error;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

const BUFFER_SIZE: usize = 4 * 1024 * 1024; // 4MB buffer

/// 串流計算單一檔案的 BLAKE3 hash
pub fn calculate_file_hash(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("無法開啟檔案: {}", path.display()))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("讀取檔案失敗: {}", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// 平行計算一批檔案的 hash，結果順序與輸入一致
///
/// 單一檔案失敗只會讓該筆結果為 `None`，不會中斷整批；
/// 收到中斷訊號後剩餘檔案一律回傳 `None`
pub fn hash_files(paths: &[PathBuf], shutdown_signal: &AtomicBool) -> Vec<Option<String>> {
    paths
        .par_iter()
        .map(|path| {
            if shutdown_signal.load(Ordering::SeqCst) {
                return None;
            }
            match calculate_file_hash(path) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    error!("hash 計算失敗 {}: {e}", path.display());
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_calculate_file_hash() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"test content").unwrap();

        let hash = calculate_file_hash(temp_file.path()).unwrap();
        assert_eq!(hash.len(), 64); // BLAKE3 produces 256-bit (64 hex chars) hash
    }

    #[test]
    fn test_same_content_same_hash() {
        let mut temp_file1 = NamedTempFile::new().unwrap();
        let mut temp_file2 = NamedTempFile::new().unwrap();

        temp_file1.write_all(b"identical content").unwrap();
        temp_file2.write_all(b"identical content").unwrap();

        let hash1 = calculate_file_hash(temp_file1.path()).unwrap();
        let hash2 = calculate_file_hash(temp_file2.path()).unwrap();

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_files_preserves_input_order() {
        let mut a = NamedTempFile::new().unwrap();
        let mut b = NamedTempFile::new().unwrap();
        a.write_all(b"content a").unwrap();
        b.write_all(b"content b").unwrap();

        let paths = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let shutdown = AtomicBool::new(false);
        let hashes = hash_files(&paths, &shutdown);

        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes[0].as_deref(), Some(calculate_file_hash(a.path()).unwrap().as_str()));
        assert_eq!(hashes[1].as_deref(), Some(calculate_file_hash(b.path()).unwrap().as_str()));
        assert_ne!(hashes[0], hashes[1]);
    }

    #[test]
    fn test_hash_files_degrades_missing_file_to_none() {
        let mut a = NamedTempFile::new().unwrap();
        a.write_all(b"still here").unwrap();

        let paths = vec![
            PathBuf::from("/nonexistent/gone.jpg"),
            a.path().to_path_buf(),
        ];
        let shutdown = AtomicBool::new(false);
        let hashes = hash_files(&paths, &shutdown);

        assert_eq!(hashes.len(), 2);
        assert!(hashes[0].is_none());
        assert!(hashes[1].is_some());
    }
}
