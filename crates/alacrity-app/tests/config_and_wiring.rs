//! 설정 → 서비스 조립 통합 테스트.

use alacrity_capture::assembler::ContextAssembler;
use alacrity_capture::file_reader::FsFileReader;
use alacrity_capture::service::{CapturePorts, ContextCaptureService};
use alacrity_capture::settings::SharedSettings;
use alacrity_core::config_manager::ConfigManager;
use alacrity_core::error::CaptureError;
use alacrity_core::models::capture::CaptureMode;
use alacrity_core::models::chat::ChatRequest;
use alacrity_core::ports::vision::{FrameAcquirer, TextExtractor};
use async_trait::async_trait;
use chrono::Local;
use image::RgbaImage;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::runtime::Handle;

struct SolidAcquirer;

#[async_trait]
impl FrameAcquirer for SolidAcquirer {
    async fn acquire(&self, _mode: &CaptureMode) -> Result<RgbaImage, CaptureError> {
        Ok(RgbaImage::new(320, 200))
    }
}

struct FixedExtractor(&'static str);

#[async_trait]
impl TextExtractor for FixedExtractor {
    async fn extract(&self, _image: &RgbaImage) -> String {
        self.0.to_string()
    }
}

fn build(manager: &ConfigManager) -> (ContextCaptureService, Arc<SharedSettings>) {
    let config = manager.get();
    let settings = Arc::new(SharedSettings::new(config.initial_settings()));
    let service = ContextCaptureService::new(
        CapturePorts {
            acquirer: Arc::new(SolidAcquirer),
            extractor: Arc::new(FixedExtractor("Inbox (3)")),
            settings: settings.clone(),
            file_reader: Arc::new(FsFileReader::new()),
        },
        config.capture_config(),
        ContextAssembler::new(config.context.timestamp_format.clone()),
        Handle::current(),
    );
    (service, settings)
}

/// 설정 파일의 선택 상태와 파일 목록이 컨텍스트에 반영되는지
#[tokio::test(start_paused = true)]
async fn config_file_drives_capture_and_files() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("plan.md");
    std::fs::write(&notes, "# Plan\n- ship").unwrap();

    let manager = ConfigManager::with_path(dir.path().join("config.json")).unwrap();
    manager
        .update_with(|c| {
            c.capture.interval_ms = 2_000;
            c.capture.max_dimension = 100;
            c.selection.capture_enabled = true;
            c.selection.selected_file_paths = vec![notes.clone()];
        })
        .unwrap();

    let (service, _settings) = build(&manager);
    service
        .start_capture(manager.get().capture_interval())
        .unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;

    let records = service.buffer().snapshot();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].image.dimensions(), (100, 63));

    let context = service.get_context();
    assert_eq!(context.matches("\nInbox (3)\n\n").count(), 2);
    assert!(context.ends_with("--- File: plan.md ---\n# Plan\n- ship\n\n"));
}

/// 시각 포맷 설정이 헤더에 반영되는지
#[tokio::test(start_paused = true)]
async fn timestamp_format_from_config() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::with_path(dir.path().join("config.json")).unwrap();
    manager
        .update_with(|c| {
            c.selection.capture_enabled = true;
            c.context.timestamp_format = "%Y-%m-%d".to_string();
        })
        .unwrap();

    let (service, _settings) = build(&manager);
    let before = Local::now().format("%Y-%m-%d").to_string();
    service.start_capture(Duration::from_secs(1)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after = Local::now().format("%Y-%m-%d").to_string();

    let context = service.get_context();
    assert!(
        context.starts_with(&format!("--- Screen Context at {before} ---\n"))
            || context.starts_with(&format!("--- Screen Context at {after} ---\n")),
        "{context}"
    );
}

/// 채팅 요청 JSON 형태
#[tokio::test]
async fn chat_request_json_shape() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "hello").unwrap();

    let manager = ConfigManager::with_path(dir.path().join("config.json")).unwrap();
    let (service, settings) = build(&manager);
    settings.set_selected_files(vec![notes]);

    let request = service.chat_request("summarize", true);
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["message"], "summarize");
    assert_eq!(json["use_screen_context"], true);
    assert_eq!(json["context"], "--- File: notes.txt ---\nhello\n\n");

    let parsed: ChatRequest = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, request);

    let plain = serde_json::to_value(service.chat_request("hi", false)).unwrap();
    assert!(plain.get("context").is_none());
}
