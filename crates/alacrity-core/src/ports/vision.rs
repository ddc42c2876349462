//! 비전 포트 — 프레임 획득과 텍스트 인식.
//!
//! 구현: `alacrity-vision` crate (xcap, leptess)

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::CaptureError;
use crate::models::capture::CaptureMode;

/// 프레임 획득기 — OS 스크린샷 기능을 추상화
#[async_trait]
pub trait FrameAcquirer: Send + Sync {
    /// 캡처 모드에 맞는 원본 이미지 한 장 획득.
    ///
    /// - `WholeScreen`: 주 모니터 이미지
    /// - `SelectedWindows`: 선택 순서대로 시도해 마지막으로 획득된 창 하나
    ///   (여러 창을 합성하지 않는다)
    async fn acquire(&self, mode: &CaptureMode) -> Result<RgbaImage, CaptureError>;
}

/// 텍스트 추출기 — OCR 엔진을 추상화.
///
/// 에러를 밖으로 내보내지 않는다. 인식 실패 시 빈 문자열을 반환한다.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// 이미지에서 텍스트 추출 (실패 시 빈 문자열)
    async fn extract(&self, image: &RgbaImage) -> String;
}
