use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 1024 * 1024; // 1MB buffer

/// 計算檔案的 BLAKE3 摘要
pub fn file_digest(path: &Path) -> Result<blake3::Hash> {
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

    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_same_content_same_digest() {
        let mut first = NamedTempFile::new().unwrap();
        let mut second = NamedTempFile::new().unwrap();
        first.write_all(b"clip bytes").unwrap();
        second.write_all(b"clip bytes").unwrap();

        assert_eq!(
            file_digest(first.path()).unwrap(),
            file_digest(second.path()).unwrap()
        );
    }

    #[test]
    fn test_different_content_different_digest() {
        let mut first = NamedTempFile::new().unwrap();
        let mut second = NamedTempFile::new().unwrap();
        first.write_all(b"clip A").unwrap();
        second.write_all(b"clip B").unwrap();

        assert_ne!(
            file_digest(first.path()).unwrap(),
            file_digest(second.path()).unwrap()
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(file_digest(Path::new("/nonexistent/clip.mp4")).is_err());
    }
}
