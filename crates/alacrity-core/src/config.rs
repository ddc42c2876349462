//! 애플리케이션 설정 구조체.
//!
//! 캡처 주기, 리사이즈/보존 한도, 초기 선택 상태, 컨텍스트 표기, OCR 옵션 등
//! 런타임 설정을 정의한다. `config_manager`를 통해 파일/환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::capture::{CaptureConfig, CaptureSettings};

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 캡처 세션 설정
    #[serde(default)]
    pub capture: CaptureSection,
    /// 초기 캡처 대상/파일 선택
    #[serde(default)]
    pub selection: SelectionConfig,
    /// 컨텍스트 조립 설정
    #[serde(default)]
    pub context: ContextConfig,
    /// OCR 설정
    #[serde(default)]
    pub ocr: OcrConfig,
}

// ============================================================
// 캡처 설정
// ============================================================

/// 캡처 세션 설정 — 세션 시작 시 `CaptureConfig`로 변환
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSection {
    /// 틱 간격 (밀리초)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// 리사이즈 후 긴 변 최대 픽셀
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// 메모리에 유지할 최근 캡처 수
    #[serde(default = "default_max_retained")]
    pub max_retained: usize,
    /// 앱 시작 시 캡처 세션 자동 시작
    #[serde(default = "default_true")]
    pub autostart: bool,
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_dimension: default_max_dimension(),
            max_retained: default_max_retained(),
            autostart: true,
        }
    }
}

// ============================================================
// 선택 설정
// ============================================================

/// 초기 선택 상태 — 앱 시작 시 `SharedSettings`에 주입
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// 캡처 활성화 여부
    #[serde(default)]
    pub capture_enabled: bool,
    /// 전체 화면 캡처 여부
    #[serde(default = "default_true")]
    pub use_whole_screen: bool,
    /// 캡처할 창 ID 목록
    #[serde(default)]
    pub selected_window_ids: Vec<u32>,
    /// 컨텍스트에 포함할 파일 경로 목록
    #[serde(default)]
    pub selected_file_paths: Vec<PathBuf>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            capture_enabled: false,
            use_whole_screen: true,
            selected_window_ids: Vec::new(),
            selected_file_paths: Vec::new(),
        }
    }
}

// ============================================================
// 컨텍스트 설정
// ============================================================

/// 컨텍스트 조립 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// 캡처 헤더 시각 포맷 (chrono strftime)
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
        }
    }
}

// ============================================================
// OCR 설정
// ============================================================

/// 인식 모드 (정확도/속도 트레이드오프)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionLevel {
    /// 최대 정확도 (캡처 빈도가 낮아 지연에 민감하지 않음)
    #[default]
    Accurate,
    /// 속도 우선
    Fast,
}

/// OCR 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract 언어 코드
    #[serde(default = "default_ocr_language")]
    pub language: String,
    /// tessdata 경로 (None이면 시스템 기본값)
    #[serde(default)]
    pub tessdata_path: Option<PathBuf>,
    /// 인식 모드
    #[serde(default)]
    pub recognition_level: RecognitionLevel,
    /// 최대 추출 문자 수 (0이면 무제한)
    #[serde(default)]
    pub max_chars: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_ocr_language(),
            tessdata_path: None,
            recognition_level: RecognitionLevel::Accurate,
            max_chars: 0,
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            capture: CaptureSection::default(),
            selection: SelectionConfig::default(),
            context: ContextConfig::default(),
            ocr: OcrConfig::default(),
        }
    }

    /// 캡처 틱 간격을 Duration으로 반환
    pub fn capture_interval(&self) -> Duration {
        Duration::from_millis(self.capture.interval_ms)
    }

    /// 세션 설정으로 변환
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig::new(
            self.capture_interval(),
            self.capture.max_dimension,
            self.capture.max_retained,
        )
    }

    /// 초기 사용자 설정 스냅샷
    pub fn initial_settings(&self) -> CaptureSettings {
        CaptureSettings {
            capture_enabled: self.selection.capture_enabled,
            use_whole_screen: self.selection.use_whole_screen,
            selected_window_ids: self.selection.selected_window_ids.clone(),
            selected_file_paths: self.selection.selected_file_paths.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}
fn default_interval_ms() -> u64 {
    1_000
}
fn default_max_dimension() -> u32 {
    1_200
}
fn default_max_retained() -> usize {
    5
}
fn default_timestamp_format() -> String {
    "%H:%M:%S".to_string()
}
fn default_ocr_language() -> String {
    "eng".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{ "capture": { "interval_ms": 2000 }, "selection": { "capture_enabled": true } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.capture.interval_ms, 2_000);
        assert_eq!(config.capture.max_retained, 5);
        assert!(config.capture.autostart);
        assert!(config.selection.capture_enabled);
        assert!(config.selection.use_whole_screen);
        assert_eq!(config.ocr.recognition_level, RecognitionLevel::Accurate);
    }

    #[test]
    fn capture_config_conversion() {
        let config = AppConfig::default_config();
        let capture = config.capture_config();
        assert_eq!(capture.interval, Duration::from_secs(1));
        assert_eq!(capture.max_dimension, 1_200);
        assert_eq!(capture.max_retained, 5);
    }

    #[test]
    fn initial_settings_mirror_selection() {
        let mut config = AppConfig::default_config();
        config.selection.use_whole_screen = false;
        config.selection.selected_window_ids = vec![11, 12];
        config.selection.selected_file_paths = vec![PathBuf::from("/tmp/notes.txt")];

        let settings = config.initial_settings();
        assert!(!settings.use_whole_screen);
        assert_eq!(settings.selected_window_ids, vec![11, 12]);
        assert_eq!(settings.selected_file_paths.len(), 1);
    }
}
