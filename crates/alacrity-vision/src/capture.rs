//! 스크린/창 캡처.
//!
//! xcap 기반 `FrameAcquirer` 구현. OS 캡처 호출은 블로킹이므로
//! `spawn_blocking`에서 실행한다.

use alacrity_core::error::CaptureError;
use alacrity_core::models::capture::CaptureMode;
use alacrity_core::models::window::WindowInfo;
use alacrity_core::ports::vision::FrameAcquirer;
use async_trait::async_trait;
use image::RgbaImage;
use tracing::debug;
use xcap::{Monitor, Window};

/// 스크린 캡처 — xcap 기반
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenCapture;

impl ScreenCapture {
    /// 새 캡처 인스턴스 생성
    pub fn new() -> Self {
        Self
    }

    /// 주 모니터 스크린 캡처 (주 모니터 표시가 없으면 첫 번째 모니터)
    pub fn capture_primary(&self) -> Result<RgbaImage, CaptureError> {
        let monitors =
            Monitor::all().map_err(|e| classify(format!("모니터 목록 조회 실패: {e}")))?;

        let monitor = monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or_else(|| CaptureError::TargetNotFound("모니터를 찾을 수 없음".to_string()))?;

        let image = monitor
            .capture_image()
            .map_err(|e| classify(format!("스크린 캡처 실패: {e}")))?;

        debug!("스크린 캡처 완료: {}x{}", image.width(), image.height());

        Ok(image)
    }

    /// 선택 창 캡처.
    ///
    /// 선택 순서대로 모두 시도하고 마지막으로 성공한 창의 이미지를 반환한다.
    /// 어떤 창도 찾지 못하면 `TargetNotFound`.
    pub fn capture_windows(&self, window_ids: &[u32]) -> Result<RgbaImage, CaptureError> {
        let windows = Window::all().map_err(|e| classify(format!("창 목록 조회 실패: {e}")))?;

        let mut captured = None;
        let mut last_error = None;

        for &id in window_ids {
            let Some(window) = windows.iter().find(|w| w.id().ok() == Some(id)) else {
                debug!("선택 창 없음: id={}", id);
                continue;
            };

            match window.capture_image() {
                Ok(image) => {
                    debug!("창 캡처 완료: id={}, {}x{}", id, image.width(), image.height());
                    captured = Some(image);
                }
                Err(e) => {
                    last_error = Some(classify(format!("창 캡처 실패: id={id}: {e}")));
                }
            }
        }

        match (captured, last_error) {
            (Some(image), _) => Ok(image),
            (None, Some(e)) => Err(e),
            (None, None) => Err(CaptureError::TargetNotFound(format!(
                "선택 창 없음: {window_ids:?}"
            ))),
        }
    }

    /// 캡처 가능한 창 목록 (최소화된 창 제외)
    pub fn list_windows(&self) -> Result<Vec<WindowInfo>, CaptureError> {
        let windows = Window::all().map_err(|e| classify(format!("창 목록 조회 실패: {e}")))?;

        let infos = windows
            .iter()
            .filter(|w| !w.is_minimized().unwrap_or(false))
            .filter_map(|w| {
                Some(WindowInfo {
                    id: w.id().ok()?,
                    title: w.title().unwrap_or_default(),
                    app_name: w.app_name().unwrap_or_default(),
                })
            })
            .collect();

        Ok(infos)
    }

    fn capture_blocking(&self, mode: &CaptureMode) -> Result<RgbaImage, CaptureError> {
        match mode {
            CaptureMode::WholeScreen => self.capture_primary(),
            CaptureMode::SelectedWindows(ids) => self.capture_windows(ids),
        }
    }
}

#[async_trait]
impl FrameAcquirer for ScreenCapture {
    async fn acquire(&self, mode: &CaptureMode) -> Result<RgbaImage, CaptureError> {
        let capture = *self;
        let mode = mode.clone();

        tokio::task::spawn_blocking(move || capture.capture_blocking(&mode))
            .await
            .map_err(|e| CaptureError::Unknown(format!("캡처 작업 조인 실패: {e}")))?
    }
}

/// xcap 에러 메시지를 캡처 실패 사유로 분류
fn classify(message: String) -> CaptureError {
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
    {
        CaptureError::PermissionDenied(message)
    } else {
        CaptureError::Unknown(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_messages_are_classified() {
        assert!(matches!(
            classify("스크린 캡처 실패: Permission denied".to_string()),
            CaptureError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify("screen recording not authorized".to_string()),
            CaptureError::PermissionDenied(_)
        ));
    }

    #[test]
    fn other_messages_are_unknown() {
        assert!(matches!(
            classify("스크린 캡처 실패: display lost".to_string()),
            CaptureError::Unknown(_)
        ));
    }
}
