//! 인메모리 사용자 설정.
//!
//! `SettingsSource` 포트 구현. 설정 UI가 setter로 갱신하고,
//! 스케줄러와 컨텍스트 조립은 호출 시점의 스냅샷을 읽는다.

use alacrity_core::models::capture::CaptureSettings;
use alacrity_core::ports::settings::SettingsSource;
use parking_lot::RwLock;
use std::path::PathBuf;
use tracing::debug;

/// 스레드 안전 공유 설정
#[derive(Debug, Default)]
pub struct SharedSettings {
    inner: RwLock<CaptureSettings>,
}

impl SharedSettings {
    /// 초기 설정으로 생성
    pub fn new(initial: CaptureSettings) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    /// 캡처 활성화 토글
    pub fn set_capture_enabled(&self, enabled: bool) {
        self.inner.write().capture_enabled = enabled;
        debug!("캡처 활성화 변경: {}", enabled);
    }

    /// 전체 화면 / 선택 창 전환
    pub fn set_use_whole_screen(&self, whole_screen: bool) {
        self.inner.write().use_whole_screen = whole_screen;
    }

    /// 선택 창 목록 교체
    pub fn set_selected_windows(&self, window_ids: Vec<u32>) {
        self.inner.write().selected_window_ids = window_ids;
    }

    /// 선택 파일 목록 교체
    pub fn set_selected_files(&self, paths: Vec<PathBuf>) {
        self.inner.write().selected_file_paths = paths;
    }

    /// 창/파일 선택 초기화, 전체 화면 모드로 복귀
    pub fn clear_selections(&self) {
        let mut settings = self.inner.write();
        settings.selected_window_ids.clear();
        settings.selected_file_paths.clear();
        settings.use_whole_screen = true;
    }
}

impl SettingsSource for SharedSettings {
    fn snapshot(&self) -> CaptureSettings {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alacrity_core::models::capture::CaptureMode;

    #[test]
    fn setters_visible_in_snapshot() {
        let settings = SharedSettings::default();
        settings.set_capture_enabled(true);
        settings.set_use_whole_screen(false);
        settings.set_selected_windows(vec![42]);
        settings.set_selected_files(vec![PathBuf::from("a.txt")]);

        let snap = settings.snapshot();
        assert!(snap.capture_enabled);
        assert_eq!(snap.capture_mode(), Some(CaptureMode::SelectedWindows(vec![42])));
        assert_eq!(snap.selected_file_paths, vec![PathBuf::from("a.txt")]);
    }

    #[test]
    fn clear_selections_resets_to_whole_screen() {
        let settings = SharedSettings::new(CaptureSettings {
            capture_enabled: true,
            use_whole_screen: false,
            selected_window_ids: vec![1, 2],
            selected_file_paths: vec![PathBuf::from("b.txt")],
        });

        settings.clear_selections();

        let snap = settings.snapshot();
        assert!(snap.capture_enabled);
        assert!(snap.use_whole_screen);
        assert!(snap.selected_window_ids.is_empty());
        assert!(snap.selected_file_paths.is_empty());
    }
}
