//! 캡처 스케줄러.
//!
//! 주기 타이머가 틱을 만들고, 승인된 틱마다 캡처 → 리사이즈 → OCR → 버퍼 추가
//! 파이프라인을 별도 태스크로 실행한다.
//!
//! - 파이프라인은 동시에 하나만 실행된다. 실행 중 도착한 틱은 큐에 쌓지 않고 버린다.
//! - 마지막 승인 틱 이후 간격의 80% 미만이면 타이머 지터로 보고 버린다.
//! - `stop()`은 타이머를 취소하고 버퍼를 비운다. 이미 실행 중인 파이프라인은
//!   중단하지 않지만, 그 결과는 버퍼 세대가 바뀌었으므로 버려진다.

use alacrity_core::error::CoreError;
use alacrity_core::models::capture::{CaptureConfig, CaptureMode, CaptureRecord};
use alacrity_core::ports::settings::SettingsSource;
use alacrity_core::ports::vision::{FrameAcquirer, TextExtractor};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::buffer::{CaptureEpoch, RecentCaptureBuffer};
use crate::preprocess;

/// 지터 허용 비율 — 마지막 승인 틱 이후 간격의 이 비율 미만이면 거부
const MIN_SPACING_RATIO: f64 = 0.8;

/// 스케줄러 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// 세션 없음 (타이머 없음)
    Idle,
    /// 타이머 동작 중, 파이프라인 없음
    Armed,
    /// 파이프라인 실행 중
    Busy,
}

/// 틱 판정 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// 파이프라인 실행
    Accepted,
    /// 세션 없음
    Inactive,
    /// 설정에서 캡처 비활성화
    Disabled,
    /// 파이프라인 실행 중 (버림)
    Busy,
    /// 지터 가드에 걸림
    TooSoon,
    /// 전체 화면도 선택 창도 없음
    NoTarget,
}

/// 타이머 지터 가드
#[derive(Debug, Clone)]
pub struct TickGate {
    min_spacing: Duration,
    last_accepted: Option<Instant>,
}

impl TickGate {
    /// 틱 간격으로 가드 생성
    pub fn new(interval: Duration) -> Self {
        Self {
            min_spacing: interval.mul_f64(MIN_SPACING_RATIO),
            last_accepted: None,
        }
    }

    /// 마지막 승인 이후 최소 간격 미달 여부
    pub fn is_too_soon(&self, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) => now.saturating_duration_since(last) < self.min_spacing,
            None => false,
        }
    }

    /// 승인 시각 기록
    pub fn mark_accepted(&mut self, now: Instant) {
        self.last_accepted = Some(now);
    }
}

struct ActiveSession {
    id: Uuid,
    config: CaptureConfig,
    gate: TickGate,
    cancel: CancellationToken,
}

/// 승인된 틱 하나의 작업 명세
struct PipelineJob {
    session_id: Uuid,
    epoch: CaptureEpoch,
    mode: CaptureMode,
    max_dimension: u32,
    timestamp: DateTime<Local>,
}

/// 파이프라인 종료 시 실행 중 플래그 해제 (패닉 포함)
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct SchedulerInner {
    acquirer: Arc<dyn FrameAcquirer>,
    extractor: Arc<dyn TextExtractor>,
    settings: Arc<dyn SettingsSource>,
    buffer: Arc<RecentCaptureBuffer>,
    runtime: Handle,
    /// 세션과 무관한 전역 플래그 (빠른 stop → start에도 중복 실행 없음)
    in_flight: Arc<AtomicBool>,
    session: Mutex<Option<ActiveSession>>,
}

impl SchedulerInner {
    fn tick(self: &Arc<Self>, for_session: Option<Uuid>) -> TickDecision {
        let mut guard = self.session.lock();
        let session = match guard.as_mut() {
            Some(session) if for_session.map_or(true, |id| id == session.id) => session,
            _ => return TickDecision::Inactive,
        };

        let settings = self.settings.snapshot();
        if !settings.capture_enabled {
            return TickDecision::Disabled;
        }

        if self.in_flight.load(Ordering::Acquire) {
            return TickDecision::Busy;
        }

        let now = Instant::now();
        if session.gate.is_too_soon(now) {
            return TickDecision::TooSoon;
        }

        let Some(mode) = settings.capture_mode() else {
            return TickDecision::NoTarget;
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return TickDecision::Busy;
        }

        session.gate.mark_accepted(now);

        let job = PipelineJob {
            session_id: session.id,
            epoch: self.buffer.epoch(),
            mode,
            max_dimension: session.config.max_dimension,
            timestamp: Local::now(),
        };
        drop(guard);

        let in_flight = InFlightGuard(self.in_flight.clone());
        let inner = Arc::clone(self);
        self.runtime.spawn(async move {
            let _in_flight = in_flight;
            inner.run_pipeline(job).await;
        });

        TickDecision::Accepted
    }

    async fn run_pipeline(&self, job: PipelineJob) {
        let frame = match self.acquirer.acquire(&job.mode).await {
            Ok(frame) => frame,
            Err(e) => {
                warn!(
                    session = %job.session_id,
                    reason = e.reason(),
                    "프레임 획득 실패, 틱 건너뜀: {e}"
                );
                return;
            }
        };

        let image = match preprocess::resize_to_fit(frame, job.max_dimension) {
            Ok(image) => image,
            Err(e) => {
                warn!(session = %job.session_id, "캡처 리사이즈 실패, 틱 건너뜀: {e}");
                return;
            }
        };

        let text = self.extractor.extract(&image).await;
        if text.is_empty() {
            debug!(session = %job.session_id, "인식된 텍스트 없음 — 빈 텍스트로 기록");
        }

        let record = CaptureRecord::new(job.timestamp, image, text);
        if self.buffer.append_in_epoch(job.epoch, record) {
            debug!(
                session = %job.session_id,
                retained = self.buffer.len(),
                "캡처 레코드 추가"
            );
        }
    }
}

/// 캡처 스케줄러
pub struct CaptureScheduler {
    inner: Arc<SchedulerInner>,
}

impl CaptureScheduler {
    /// 새 스케줄러 생성.
    ///
    /// 타이머와 파이프라인 태스크는 `runtime`에서 실행되므로
    /// `start`/`stop`/`tick`은 어느 스레드에서든 호출할 수 있다.
    pub fn new(
        acquirer: Arc<dyn FrameAcquirer>,
        extractor: Arc<dyn TextExtractor>,
        settings: Arc<dyn SettingsSource>,
        buffer: Arc<RecentCaptureBuffer>,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                acquirer,
                extractor,
                settings,
                buffer,
                runtime,
                in_flight: Arc::new(AtomicBool::new(false)),
                session: Mutex::new(None),
            }),
        }
    }

    /// 캡처 세션 시작 (이미 실행 중이면 no-op)
    pub fn start(&self, config: CaptureConfig) -> Result<(), CoreError> {
        config.validate()?;

        let mut session = self.inner.session.lock();
        if let Some(active) = session.as_ref() {
            debug!(session = %active.id, "캡처 세션 이미 실행 중 — 시작 요청 무시");
            return Ok(());
        }

        self.inner.buffer.set_capacity(config.max_retained);

        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let interval = config.interval;

        info!(
            session = %id,
            interval_ms = interval.as_millis() as u64,
            max_dimension = config.max_dimension,
            max_retained = config.max_retained,
            "캡처 세션 시작"
        );

        *session = Some(ActiveSession {
            id,
            gate: TickGate::new(interval),
            config,
            cancel: cancel.clone(),
        });
        drop(session);

        self.inner.runtime.spawn(run_timer(
            Arc::downgrade(&self.inner),
            id,
            interval,
            cancel,
        ));

        Ok(())
    }

    /// 캡처 세션 종료 + 버퍼 비우기 (멱등)
    pub fn stop(&self) {
        let mut session = self.inner.session.lock();
        if let Some(active) = session.take() {
            active.cancel.cancel();
            info!(session = %active.id, "캡처 세션 종료");
        }
        self.inner.buffer.clear();
    }

    /// 틱 한 번 평가 (타이머가 호출, 수동 호출 가능)
    pub fn tick(&self) -> TickDecision {
        self.inner.tick(None)
    }

    /// 현재 상태
    pub fn state(&self) -> SchedulerState {
        if self.inner.session.lock().is_none() {
            SchedulerState::Idle
        } else if self.inner.in_flight.load(Ordering::Acquire) {
            SchedulerState::Busy
        } else {
            SchedulerState::Armed
        }
    }

    /// 세션 실행 여부
    pub fn is_running(&self) -> bool {
        self.inner.session.lock().is_some()
    }

    /// 파이프라인 실행 여부 (세션과 무관)
    pub fn is_pipeline_in_flight(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// 현재 세션 설정
    pub fn session_config(&self) -> Option<CaptureConfig> {
        self.inner
            .session
            .lock()
            .as_ref()
            .map(|active| active.config.clone())
    }
}

impl Drop for CaptureScheduler {
    fn drop(&mut self) {
        if let Some(active) = self.inner.session.lock().take() {
            active.cancel.cancel();
        }
    }
}

async fn run_timer(
    inner: Weak<SchedulerInner>,
    session_id: Uuid,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(session = %session_id, "캡처 타이머 종료");
                break;
            }
            _ = ticker.tick() => {
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                let decision = inner.tick(Some(session_id));
                debug!(session = %session_id, ?decision, "캡처 틱");
            }
        }
    }
}
