//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 플랫폼 어댑터(`alacrity-vision`)와 앱 크레이트가 이 trait들을 구현하며,
//! `alacrity-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 시간이 걸리는 포트(프레임 획득, 텍스트 인식)는 `async_trait`을 사용하고,
//! `get_context()` 경로에서 호출되는 포트(파일 읽기, 설정)는 동기 trait이다.

pub mod file_reader;
pub mod settings;
pub mod vision;
