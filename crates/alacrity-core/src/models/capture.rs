//! 캡처 파이프라인 모델.
//!
//! 캡처 레코드, 캡처 모드, 세션 설정, 틱마다 읽는 사용자 설정 스냅샷을 정의한다.

use chrono::{DateTime, Local};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::CoreError;

/// 캡처 대상
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    /// 주 모니터 전체
    WholeScreen,
    /// 선택된 창 (선택 순서 유지, 마지막으로 획득된 창 하나만 사용)
    SelectedWindows(Vec<u32>),
}

/// 캡처 레코드 — 틱 하나의 결과.
///
/// 생성 후 변경되지 않는다. 용량 초과로 밀려나거나 버퍼 전체 비우기로만 제거된다.
#[derive(Debug, Clone)]
pub struct CaptureRecord {
    /// 틱이 승인된 시각
    pub timestamp: DateTime<Local>,
    /// 리사이즈된 이미지 (스냅샷 복사 비용을 줄이기 위해 Arc 공유)
    pub image: Arc<RgbaImage>,
    /// OCR 추출 텍스트 (인식 실패 시 빈 문자열)
    pub extracted_text: String,
}

impl CaptureRecord {
    /// 새 레코드 생성
    pub fn new(timestamp: DateTime<Local>, image: RgbaImage, extracted_text: String) -> Self {
        Self {
            timestamp,
            image: Arc::new(image),
            extracted_text,
        }
    }
}

/// 캡처 세션 설정.
///
/// 세션 시작 시 전달되며 세션이 끝날 때까지 변경되지 않는다.
/// 캡처 모드는 틱마다 `SettingsSource`에서 결정된다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// 틱 간격
    pub interval: Duration,
    /// 리사이즈 후 긴 변의 최대 픽셀
    pub max_dimension: u32,
    /// 버퍼에 유지할 최대 레코드 수
    pub max_retained: usize,
}

impl CaptureConfig {
    /// 세션 설정 생성
    pub fn new(interval: Duration, max_dimension: u32, max_retained: usize) -> Self {
        Self {
            interval,
            max_dimension,
            max_retained,
        }
    }

    /// 0 값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interval.is_zero() {
            return Err(CoreError::Validation {
                field: "interval".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        if self.max_dimension == 0 {
            return Err(CoreError::Validation {
                field: "max_dimension".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        if self.max_retained == 0 {
            return Err(CoreError::Validation {
                field: "max_retained".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_dimension: 1_200,
            max_retained: 5,
        }
    }
}

/// 사용자 설정 스냅샷 — 틱 또는 `get_context()` 호출 시점에 읽는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// 캡처 활성화 여부
    pub capture_enabled: bool,
    /// 전체 화면 캡처 여부 (false면 선택 창 캡처)
    pub use_whole_screen: bool,
    /// 선택된 창 ID (선택 순서)
    pub selected_window_ids: Vec<u32>,
    /// 컨텍스트에 포함할 파일 경로 (선택 순서)
    pub selected_file_paths: Vec<PathBuf>,
}

impl CaptureSettings {
    /// 현재 설정으로 캡처 모드 결정.
    ///
    /// 전체 화면이 꺼져 있고 선택된 창도 없으면 `None` (틱 건너뜀).
    pub fn capture_mode(&self) -> Option<CaptureMode> {
        if self.use_whole_screen {
            Some(CaptureMode::WholeScreen)
        } else if !self.selected_window_ids.is_empty() {
            Some(CaptureMode::SelectedWindows(self.selected_window_ids.clone()))
        } else {
            None
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            capture_enabled: false,
            use_whole_screen: true,
            selected_window_ids: Vec::new(),
            selected_file_paths: Vec::new(),
        }
    }
}
