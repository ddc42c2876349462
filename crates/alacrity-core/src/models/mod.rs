//! 도메인 모델.
//!
//! 캡처 파이프라인과 채팅 요청 경계에서 사용하는 데이터 구조체.

pub mod capture;
pub mod chat;
pub mod window;
