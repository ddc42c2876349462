//! 사용자 설정 포트.
//!
//! 설정 UI와 설정 영속화는 외부 협력자가 담당한다.
//! 스케줄러는 틱마다, 컨텍스트 조립기는 호출마다 스냅샷을 읽는다.

use crate::models::capture::CaptureSettings;

/// 읽기 전용 설정 소스
pub trait SettingsSource: Send + Sync {
    /// 현재 설정 스냅샷
    fn snapshot(&self) -> CaptureSettings;
}
