//! 로컬 파일 읽기.
//!
//! `FileReader` 포트 구현. 읽기 실패는 `None`으로 흡수한다.

use alacrity_core::ports::file_reader::FileReader;
use std::fs;
use std::path::Path;
use tracing::debug;

/// 파일시스템 기반 텍스트 읽기
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileReader;

impl FsFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl FileReader for FsFileReader {
    fn read_text(&self, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("컨텍스트 파일 읽기 실패 (생략): {}: {e}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        assert_eq!(FsFileReader::new().read_text(&path).as_deref(), Some("hello"));
    }

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(FsFileReader::new()
            .read_text(&dir.path().join("missing.txt"))
            .is_none());
    }

    #[test]
    fn non_utf8_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        assert!(FsFileReader::new().read_text(&path).is_none());
    }
}
