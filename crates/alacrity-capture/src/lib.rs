//! # alacrity-capture
//!
//! 컨텍스트 캡처 파이프라인.
//! 주기 캡처 스케줄링, 최근 캡처 버퍼, 리사이즈 전처리, 컨텍스트 문자열 조립을 담당한다.
//! 플랫폼 의존 캡처/OCR은 `alacrity-core` 포트 뒤에 있으며 `alacrity-vision`이 구현한다.
//!
//! ## 구조
//!
//! - [`scheduler`] — 타이머 틱 판정 (busy-skip, 지터 가드) + 파이프라인 실행
//! - [`buffer`] — 고정 용량 FIFO + 세대 번호
//! - [`preprocess`] — 긴 변 기준 다운스케일 (fast_image_resize)
//! - [`assembler`] — 컨텍스트 문자열 조립
//! - [`service`] — `start_capture` / `stop_capture` / `get_context` 진입점
//! - [`settings`] / [`file_reader`] — 기본 포트 어댑터

pub mod assembler;
pub mod buffer;
pub mod file_reader;
pub mod preprocess;
pub mod scheduler;
pub mod service;
pub mod settings;
