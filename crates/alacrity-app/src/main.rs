//! # alacrity-app
//!
//! Alacrity 바이너리 진입점.
//! 설정 로드, 어댑터 조립(DI), 캡처 세션 시작/종료, 종료 시 컨텍스트 출력.

mod lifecycle;

use alacrity_capture::assembler::ContextAssembler;
use alacrity_capture::file_reader::FsFileReader;
use alacrity_capture::service::{CapturePorts, ContextCaptureService};
use alacrity_capture::settings::SharedSettings;
use alacrity_core::config::AppConfig;
use alacrity_core::config_manager::ConfigManager;
use alacrity_vision::capture::ScreenCapture;
use alacrity_vision::ocr::LocalTextExtractor;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::{run_until_shutdown, LifecycleManager};

/// 캡처 상태 로그 주기
const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(30);

/// Alacrity 데스크톱 어시스턴트 — 화면 컨텍스트 캡처
#[derive(Parser, Debug)]
#[command(name = "alacrity")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 캡처 간격 (밀리초, 설정 파일 값 오버라이드)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// 캡처 활성화 (설정 파일 값 오버라이드)
    #[arg(long)]
    enable: bool,

    /// 캡처할 창 ID (반복 지정 가능, 지정 시 전체 화면 대신 창 캡처)
    #[arg(long = "window", short = 'w')]
    windows: Vec<u32>,

    /// 컨텍스트에 포함할 파일 (반복 지정 가능)
    #[arg(long = "file", short = 'f')]
    files: Vec<PathBuf>,

    /// 캡처 가능한 창 목록 출력 후 종료
    #[arg(long)]
    list_windows: bool,

    /// 종료 시 이 메시지로 채팅 요청 JSON 출력 (없으면 컨텍스트 문자열 출력)
    #[arg(long, short = 'm')]
    message: Option<String>,

    /// 채팅 요청에 화면 컨텍스트를 넣지 않음
    #[arg(long)]
    no_context: bool,

    /// 지정 시간(초) 후 자동 종료
    #[arg(long)]
    duration_secs: Option<u64>,
}

/// CLI 인자로 설정 오버라이드
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(interval_ms) = args.interval_ms {
        config.capture.interval_ms = interval_ms;
    }
    if args.enable {
        config.selection.capture_enabled = true;
    }
    if !args.windows.is_empty() {
        config.selection.use_whole_screen = false;
        config.selection.selected_window_ids = args.windows.clone();
    }
    if !args.files.is_empty() {
        config.selection.selected_file_paths = args.files.clone();
    }
}

/// 어댑터 조립
fn build_service(config: &AppConfig, settings: Arc<SharedSettings>) -> ContextCaptureService {
    let ports = CapturePorts {
        acquirer: Arc::new(ScreenCapture::new()),
        extractor: Arc::new(LocalTextExtractor::new(&config.ocr)),
        settings,
        file_reader: Arc::new(FsFileReader::new()),
    };

    ContextCaptureService::new(
        ports,
        config.capture_config(),
        ContextAssembler::new(config.context.timestamp_format.clone()),
        Handle::current(),
    )
}

/// 창 목록 출력
fn print_windows() -> Result<()> {
    let windows = ScreenCapture::new()
        .list_windows()
        .context("창 목록 조회 실패")?;

    if windows.is_empty() {
        println!("캡처 가능한 창이 없습니다.");
        return Ok(());
    }

    for window in windows {
        println!("{:>8}  {:<24}  {}", window.id, window.app_name, window.title);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "alacrity={},alacrity_app={},alacrity_core={},alacrity_capture={},alacrity_vision={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.list_windows {
        return print_windows();
    }

    info!("Alacrity 시작");

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {}", config_manager.config_path().display());

    let mut config = config_manager.get();
    apply_overrides(&mut config, &args);

    let settings = Arc::new(SharedSettings::new(config.initial_settings()));
    let service = Arc::new(build_service(&config, settings));

    if config.capture.autostart {
        service
            .start_capture(config.capture_interval())
            .context("캡처 세션 시작 실패")?;
    } else {
        warn!("autostart 비활성화 — 캡처 세션을 시작하지 않음");
    }

    if !config.selection.capture_enabled {
        warn!("캡처 비활성화 상태 — --enable 또는 selection.capture_enabled로 활성화");
    }

    let lifecycle = LifecycleManager::new();

    let status_service = service.clone();
    let status_task = tokio::spawn(run_until_shutdown(
        lifecycle.subscribe(),
        STATUS_LOG_INTERVAL,
        move || {
            info!(
                state = ?status_service.state(),
                retained = status_service.buffer().len(),
                "캡처 상태"
            );
        },
    ));

    let reason = lifecycle
        .wait(args.duration_secs.map(Duration::from_secs))
        .await;
    info!(?reason, "종료 중");
    if let Err(e) = status_task.await {
        warn!("상태 로그 태스크 종료 실패: {e}");
    }

    // stop_capture는 버퍼를 비우므로 출력이 먼저
    match &args.message {
        Some(message) => {
            let request = service.chat_request(message.clone(), !args.no_context);
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        None => print!("{}", service.get_context()),
    }

    service.stop_capture();
    info!("Alacrity 종료");

    Ok(())
}
