//! # alacrity-vision
//!
//! 플랫폼 캡처/OCR 어댑터.
//! xcap 기반 스크린·창 캡처(`FrameAcquirer`)와
//! Tesseract 기반 텍스트 추출(`TextExtractor`)을 제공한다.

pub mod capture;
pub mod ocr;
