//! 채팅 요청 페이로드.
//!
//! HTTP 전송은 외부 협력자가 담당한다. 이 모델은 전송 직전의 JSON 형태만 정의한다.

use serde::{Deserialize, Serialize};

/// 어시스턴트 서비스로 보내는 채팅 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// 사용자 메시지
    pub message: String,
    /// 화면 컨텍스트 사용 여부
    pub use_screen_context: bool,
    /// 조립된 컨텍스트 (`use_screen_context`가 true일 때만 포함)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}
