//! OCR 텍스트 추출.
//!
//! `leptess` 기반 Tesseract 래퍼. Tesseract 호출은 `ocr` feature 활성화 시에만 빌드되며,
//! 비활성화 빌드에서 `LocalTextExtractor`는 항상 빈 문자열을 반환한다.
//!
//! 인식된 줄은 앞뒤 공백을 제거한 뒤 공백 하나로 이어 붙인다.

use alacrity_core::config::{OcrConfig, RecognitionLevel};
use alacrity_core::ports::vision::TextExtractor;
use async_trait::async_trait;
use image::RgbaImage;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// OCR 에러 타입
#[derive(Debug, Error)]
pub enum OcrError {
    /// Tesseract 초기화 실패
    #[error("OCR 초기화 실패: {0}")]
    Init(String),

    /// 이미지 설정 실패
    #[error("OCR 이미지 설정 실패: {0}")]
    ImageSetup(String),

    /// 텍스트 추출 실패
    #[error("OCR 텍스트 추출 실패: {0}")]
    Extraction(String),

    /// 빈 이미지 입력
    #[error("빈 이미지: 너비 또는 높이가 0")]
    EmptyImage,

    /// 비동기 작업 실패
    #[error("OCR 비동기 작업 실패: {0}")]
    Async(String),

    /// `ocr` feature 없이 빌드됨
    #[error("OCR 비활성화 빌드")]
    Disabled,
}

/// 인식 결과 정규화 — 줄 단위 trim, 빈 줄 제거, 공백 하나로 연결, 문자 수 제한
pub fn normalize_text(raw: &str, max_chars: usize) -> String {
    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if max_chars > 0 && joined.chars().count() > max_chars {
        joined.chars().take(max_chars).collect()
    } else {
        joined
    }
}

/// 인식 모드가 조정하는 Tesseract 런타임 변수
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TessParam {
    /// 페이지 분할 모드
    PageSegMode,
    /// 사전에 없는 단어 페널티 (0이면 사전 보정 없음)
    PenaltyNonDictWord,
    /// 빈도 사전에 없는 단어 페널티
    PenaltyNonFreqDictWord,
}

impl TessParam {
    /// Tesseract 변수 이름
    pub fn name(self) -> &'static str {
        match self {
            Self::PageSegMode => "tessedit_pageseg_mode",
            Self::PenaltyNonDictWord => "language_model_penalty_non_dict_word",
            Self::PenaltyNonFreqDictWord => "language_model_penalty_non_freq_dict_word",
        }
    }

    #[cfg(feature = "ocr")]
    fn variable(self) -> leptess::Variable {
        match self {
            Self::PageSegMode => leptess::Variable::TesseditPagesegMode,
            Self::PenaltyNonDictWord => leptess::Variable::LanguageModelPenaltyNonDictWord,
            Self::PenaltyNonFreqDictWord => leptess::Variable::LanguageModelPenaltyNonFreqDictWord,
        }
    }
}

/// 인식 모드별 Tesseract 변수.
///
/// - `Accurate`: 자동 페이지 분할(3) + 사전 기반 언어 보정
/// - `Fast`: 단일 블록 가정(6), 사전 보정 끔
///
/// `load_*_dawg`는 초기화 전용 변수라 `LepTess::new` 이후에는 바꿀 수 없으므로,
/// 보정 강도는 사전 외 단어 페널티로 조절한다.
pub fn recognition_params(level: RecognitionLevel) -> &'static [(TessParam, &'static str)] {
    match level {
        RecognitionLevel::Accurate => &[
            (TessParam::PageSegMode, "3"),
            (TessParam::PenaltyNonDictWord, "0.15"),
            (TessParam::PenaltyNonFreqDictWord, "0.1"),
        ],
        RecognitionLevel::Fast => &[
            (TessParam::PageSegMode, "6"),
            (TessParam::PenaltyNonDictWord, "0"),
            (TessParam::PenaltyNonFreqDictWord, "0"),
        ],
    }
}

/// OCR 텍스트 추출기
#[derive(Debug, Clone)]
pub struct OcrExtractor {
    /// Tesseract 데이터 경로 (None이면 시스템 기본값)
    tessdata_path: Option<PathBuf>,
    /// Tesseract 언어 코드
    language: String,
    /// 인식 모드
    recognition_level: RecognitionLevel,
    /// 최대 추출 문자 수 (0이면 무제한)
    max_chars: usize,
}

impl OcrExtractor {
    /// 설정에서 추출기 생성
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            tessdata_path: config.tessdata_path.clone(),
            language: config.language.clone(),
            recognition_level: config.recognition_level,
            max_chars: config.max_chars,
        }
    }

    /// 최대 문자 수 제한 설정
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// tessdata 경로 반환
    pub fn tessdata_path(&self) -> Option<&PathBuf> {
        self.tessdata_path.as_ref()
    }

    /// Tesseract 언어 코드
    pub fn language(&self) -> &str {
        &self.language
    }

    /// 인식 모드
    pub fn recognition_level(&self) -> RecognitionLevel {
        self.recognition_level
    }

    /// 이미지에서 텍스트 추출 (비동기, spawn_blocking)
    pub async fn extract_async(&self, image: &RgbaImage) -> Result<String, OcrError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::EmptyImage);
        }

        let extractor = self.clone();
        let image = image.clone();

        tokio::task::spawn_blocking(move || extractor.extract(&image))
            .await
            .map_err(|e| OcrError::Async(format!("작업 조인 실패: {e}")))?
    }

    /// 이미지에서 텍스트 추출 (동기)
    #[cfg(feature = "ocr")]
    pub fn extract(&self, image: &RgbaImage) -> Result<String, OcrError> {
        use std::io::Cursor;

        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::EmptyImage);
        }

        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| OcrError::ImageSetup(format!("PNG 인코딩 실패: {e}")))?;

        let tessdata = self
            .tessdata_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());

        let mut lt = leptess::LepTess::new(tessdata.as_deref(), &self.language)
            .map_err(|e| OcrError::Init(format!("{e}")))?;

        for &(param, value) in recognition_params(self.recognition_level) {
            lt.set_variable(param.variable(), value)
                .map_err(|e| OcrError::Init(format!("{}={}: {e}", param.name(), value)))?;
        }

        lt.set_image_from_mem(png.get_ref())
            .map_err(|e| OcrError::ImageSetup(format!("{e}")))?;

        let raw = lt
            .get_utf8_text()
            .map_err(|e| OcrError::Extraction(format!("{e}")))?;

        Ok(normalize_text(&raw, self.max_chars))
    }

    /// 이미지에서 텍스트 추출 (동기) — `ocr` feature 비활성화 빌드
    #[cfg(not(feature = "ocr"))]
    pub fn extract(&self, image: &RgbaImage) -> Result<String, OcrError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(OcrError::EmptyImage);
        }
        Err(OcrError::Disabled)
    }
}

/// 로컬 OCR 기반 `TextExtractor`.
///
/// 실패는 모두 빈 문자열로 흡수한다 (캡처 레코드는 빈 텍스트로 남는다).
#[derive(Debug, Clone)]
pub struct LocalTextExtractor {
    extractor: OcrExtractor,
}

impl LocalTextExtractor {
    /// 설정에서 생성
    pub fn new(config: &OcrConfig) -> Self {
        if !cfg!(feature = "ocr") {
            warn!("ocr feature 없이 빌드됨 — 캡처 텍스트는 항상 비어 있음");
        }
        Self {
            extractor: OcrExtractor::new(config),
        }
    }
}

#[async_trait]
impl TextExtractor for LocalTextExtractor {
    async fn extract(&self, image: &RgbaImage) -> String {
        match self.extractor.extract_async(image).await {
            Ok(text) => text,
            Err(OcrError::Disabled) => String::new(),
            Err(e) => {
                debug!("텍스트 인식 실패 (빈 텍스트로 기록): {e}");
                String::new()
            }
        }
    }
}
