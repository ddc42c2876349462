//! 라이프사이클 관리.
//!
//! 종료 시그널 대기와 종료 브로드캐스트.

use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
    /// 지정한 실행 시간 경과
    Elapsed,
}

/// 라이프사이클 관리자
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl LifecycleManager {
    /// 새 라이프사이클 관리자 생성
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    /// 종료 수신기 복제
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    /// 종료 신호 발송
    pub fn shutdown(&self) {
        info!("종료 신호 발송");
        let _ = self.shutdown_tx.send(true);
    }

    /// OS 시그널 또는 실행 시간 경과 대기
    pub async fn wait(&self, run_for: Option<Duration>) -> ShutdownReason {
        let reason = match run_for {
            Some(limit) => tokio::select! {
                reason = wait_for_signal() => reason,
                _ = tokio::time::sleep(limit) => {
                    info!("실행 시간 경과: {}초", limit.as_secs());
                    ShutdownReason::Elapsed
                }
            },
            None => wait_for_signal().await,
        };

        self.shutdown();
        reason
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 종료 신호까지 `every` 간격으로 `on_tick` 실행 (첫 실행은 `every` 이후)
pub async fn run_until_shutdown<F>(
    mut shutdown_rx: watch::Receiver<bool>,
    every: Duration,
    mut on_tick: F,
) where
    F: FnMut(),
{
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => on_tick(),
        }
    }
}

/// OS 시그널 대기 (SIGINT, SIGTERM)
async fn wait_for_signal() -> ShutdownReason {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigint, mut sigterm) =
            match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("시그널 핸들러 등록 실패, Ctrl+C만 대기: {e}");
                    return wait_for_ctrl_c().await;
                }
            };

        tokio::select! {
            _ = sigint.recv() => {
                info!("SIGINT 수신");
                ShutdownReason::Interrupt
            }
            _ = sigterm.recv() => {
                info!("SIGTERM 수신");
                ShutdownReason::Terminate
            }
        }
    }

    #[cfg(not(unix))]
    {
        wait_for_ctrl_c().await
    }
}

async fn wait_for_ctrl_c() -> ShutdownReason {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl+C 핸들러 등록 실패: {e}");
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C 수신");
    ShutdownReason::Interrupt
}
