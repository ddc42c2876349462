//! 파일 읽기 포트.

use std::path::Path;

/// best-effort 텍스트 파일 읽기.
///
/// 읽을 수 없거나 없는 파일은 `None`. 컨텍스트 조립 시 해당 파일은 생략된다.
pub trait FileReader: Send + Sync {
    /// 파일 전체를 텍스트로 읽기
    fn read_text(&self, path: &Path) -> Option<String>;
}
