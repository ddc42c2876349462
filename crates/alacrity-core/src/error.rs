//! Alacrity 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 에러를 `CoreError` 또는 `CaptureError`로 변환한다.
//! 캡처 파이프라인은 best-effort이므로 이 에러들은 채팅 경로로 전파되지 않는다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 유효성 검증 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 프레임 획득 실패
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// 프레임 획득 실패 사유.
///
/// 스케줄러는 이 에러를 받으면 현재 틱만 건너뛰고 Armed 상태로 돌아간다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// OS가 화면 캡처 권한을 거부함
    #[error("캡처 권한 거부: {0}")]
    PermissionDenied(String),

    /// 요청한 모니터/창이 더 이상 존재하지 않음
    #[error("캡처 대상 미발견: {0}")]
    TargetNotFound(String),

    /// 그 밖의 캡처 실패
    #[error("캡처 실패: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// 로그 필드용 짧은 사유 이름
    pub fn reason(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "permission_denied",
            Self::TargetNotFound(_) => "target_not_found",
            Self::Unknown(_) => "unknown",
        }
    }
}
