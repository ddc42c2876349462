//! 컨텍스트 캡처 서비스 — 외부에 노출되는 진입점.
//!
//! 스케줄러, 버퍼, 설정, 파일 읽기 포트를 묶어
//! `start_capture` / `stop_capture` / `get_context`를 제공한다.

use alacrity_core::error::CoreError;
use alacrity_core::models::capture::CaptureConfig;
use alacrity_core::models::chat::ChatRequest;
use alacrity_core::ports::file_reader::FileReader;
use alacrity_core::ports::settings::SettingsSource;
use alacrity_core::ports::vision::{FrameAcquirer, TextExtractor};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

use crate::assembler::{ContextAssembler, FileContext};
use crate::buffer::RecentCaptureBuffer;
use crate::scheduler::{CaptureScheduler, SchedulerState};

/// 서비스가 사용하는 포트 묶음
#[derive(Clone)]
pub struct CapturePorts {
    pub acquirer: Arc<dyn FrameAcquirer>,
    pub extractor: Arc<dyn TextExtractor>,
    pub settings: Arc<dyn SettingsSource>,
    pub file_reader: Arc<dyn FileReader>,
}

/// 컨텍스트 캡처 서비스
pub struct ContextCaptureService {
    scheduler: CaptureScheduler,
    buffer: Arc<RecentCaptureBuffer>,
    settings: Arc<dyn SettingsSource>,
    file_reader: Arc<dyn FileReader>,
    assembler: ContextAssembler,
    defaults: CaptureConfig,
}

impl ContextCaptureService {
    /// 서비스 생성.
    ///
    /// `defaults`의 리사이즈/보존 한도는 `start_capture`가 만드는 모든 세션에 쓰인다.
    pub fn new(
        ports: CapturePorts,
        defaults: CaptureConfig,
        assembler: ContextAssembler,
        runtime: Handle,
    ) -> Self {
        let buffer = Arc::new(RecentCaptureBuffer::new(defaults.max_retained));
        let scheduler = CaptureScheduler::new(
            ports.acquirer,
            ports.extractor,
            ports.settings.clone(),
            buffer.clone(),
            runtime,
        );

        Self {
            scheduler,
            buffer,
            settings: ports.settings,
            file_reader: ports.file_reader,
            assembler,
            defaults,
        }
    }

    /// 주어진 간격으로 캡처 시작 (이미 실행 중이면 no-op)
    pub fn start_capture(&self, interval: Duration) -> Result<(), CoreError> {
        let config = CaptureConfig {
            interval,
            ..self.defaults.clone()
        };
        self.scheduler.start(config)
    }

    /// 세션 설정 전체를 지정해 시작
    pub fn start_with(&self, config: CaptureConfig) -> Result<(), CoreError> {
        self.scheduler.start(config)
    }

    /// 캡처 종료 + 버퍼 비우기 (멱등)
    pub fn stop_capture(&self) {
        self.scheduler.stop();
    }

    /// 최근 캡처와 선택 파일로 컨텍스트 문자열 조립.
    ///
    /// 읽지 못한 파일은 조용히 건너뛴다.
    pub fn get_context(&self) -> String {
        let records = self.buffer.snapshot();
        let files: Vec<FileContext> = self
            .settings
            .snapshot()
            .selected_file_paths
            .iter()
            .filter_map(|path| {
                self.file_reader
                    .read_text(path)
                    .map(|text| FileContext::new(display_name(path), text))
            })
            .collect();

        debug!(
            captures = records.len(),
            files = files.len(),
            "컨텍스트 조립"
        );

        self.assembler.assemble(&records, &files)
    }

    /// 채팅 요청 페이로드 생성 (컨텍스트는 사용 시에만 조립)
    pub fn chat_request(&self, message: impl Into<String>, use_screen_context: bool) -> ChatRequest {
        ChatRequest {
            message: message.into(),
            use_screen_context,
            context: use_screen_context.then(|| self.get_context()),
        }
    }

    /// 스케줄러 상태
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// 스케줄러 접근
    pub fn scheduler(&self) -> &CaptureScheduler {
        &self.scheduler
    }

    /// 버퍼 접근
    pub fn buffer(&self) -> &Arc<RecentCaptureBuffer> {
        &self.buffer
    }
}

/// 헤더용 파일 이름 (마지막 경로 요소, 없으면 전체 경로)
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
