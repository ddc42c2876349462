//! 컨텍스트 조립.
//!
//! 버퍼 스냅샷과 선택 파일 내용을 채팅 요청의 `context` 필드 문자열로 평탄화한다.
//!
//! ```text
//! --- Screen Context at <timestamp> ---
//! <text>
//!
//! --- File: <name> ---
//! <text>
//!
//! ```

use alacrity_core::models::capture::CaptureRecord;
use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;
use tracing::warn;

/// 기본 시각 포맷
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// strftime 포맷 검증 (알 수 없는 지정자가 있으면 false)
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// 선택 파일 한 개의 내용
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    /// 헤더에 표시할 파일 이름
    pub name: String,
    /// 파일 텍스트
    pub text: String,
}

impl FileContext {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// 컨텍스트 조립기
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    timestamp_format: String,
}

impl ContextAssembler {
    /// 시각 포맷 지정 생성.
    ///
    /// 잘못된 포맷이면 `DEFAULT_TIMESTAMP_FORMAT`을 사용한다.
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        let mut timestamp_format = timestamp_format.into();
        if !is_valid_timestamp_format(&timestamp_format) {
            warn!(
                "잘못된 시각 포맷 {:?}, 기본값 {:?} 사용",
                timestamp_format, DEFAULT_TIMESTAMP_FORMAT
            );
            timestamp_format = DEFAULT_TIMESTAMP_FORMAT.to_string();
        }
        Self { timestamp_format }
    }

    /// 사용 중인 시각 포맷
    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// 캡처(오래된 순) → 파일(선택 순) 순서로 조립.
    ///
    /// 같은 입력이면 항상 같은 바이트열을 만든다.
    pub fn assemble(&self, records: &[CaptureRecord], files: &[FileContext]) -> String {
        let mut context = String::new();

        for record in records {
            // 포맷은 new()에서 검증됨
            let _ = write!(
                context,
                "--- Screen Context at {} ---\n{}\n\n",
                record.timestamp.format(&self.timestamp_format),
                record.extracted_text
            );
        }

        for file in files {
            let _ = write!(context, "--- File: {} ---\n{}\n\n", file.name, file.text);
        }

        context
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}
