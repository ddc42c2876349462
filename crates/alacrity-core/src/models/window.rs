//! 캡처 가능한 창 정보.

use serde::{Deserialize, Serialize};

/// 창 선택 UI에 노출하는 창 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// OS 창 ID (`CaptureMode::SelectedWindows`에 사용)
    pub id: u32,
    /// 창 제목
    pub title: String,
    /// 소유 앱 이름
    pub app_name: String,
}
