use crate::models::config::ScanConfig;
use crate::services::ocr::{scan_frame, FrameSource};
use crate::services::scan_cycle::{FrameVerdict, ScanCycle, ScanPhase};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Drives a frame source at a fixed cadence and feeds resolved frames into
/// the scan cycle. At most one frame is in flight at a time; nothing is
/// captured while the cycle is paused for review.
pub struct Scanner {
    cycle: Arc<Mutex<ScanCycle>>,
    stop_signal: Arc<Mutex<bool>>,
    phase_tx: Arc<watch::Sender<ScanPhase>>,
    interval: Duration,
}

impl Scanner {
    pub fn new(interval: Duration) -> Self {
        let (phase_tx, _) = watch::channel(ScanPhase::Scanning);

        Self {
            cycle: Arc::new(Mutex::new(ScanCycle::new())),
            stop_signal: Arc::new(Mutex::new(false)),
            phase_tx: Arc::new(phase_tx),
            interval,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(Duration::from_millis(config.interval_ms))
    }

    /// Receiver notified on every phase change
    pub fn subscribe(&self) -> watch::Receiver<ScanPhase> {
        self.phase_tx.subscribe()
    }

    /// Copy of the current cycle state
    pub async fn snapshot(&self) -> ScanCycle {
        self.cycle.lock().await.clone()
    }

    /// Apply a user action (edit, retry) to the cycle
    pub async fn update(&self, f: impl FnOnce(ScanCycle) -> ScanCycle) -> ScanCycle {
        let mut cycle = self.cycle.lock().await;
        *cycle = f(std::mem::take(&mut *cycle));
        self.phase_tx.send_replace(cycle.phase());
        cycle.clone()
    }

    /// Signal the scan loop to finish after its current tick
    pub async fn stop(&self) {
        *self.stop_signal.lock().await = true;
        tracing::info!("scan loop stop requested");
    }

    /// Spawn the scan loop. The task ends when stopped, or when the source is
    /// exhausted while scanning. A stopped scanner can be started again.
    pub async fn start(&self, source: Arc<dyn FrameSource>) -> JoinHandle<()> {
        // Reset stop signal
        *self.stop_signal.lock().await = false;

        let cycle = Arc::clone(&self.cycle);
        let stop_signal = Arc::clone(&self.stop_signal);
        let phase_tx = Arc::clone(&self.phase_tx);
        let interval = self.interval;

        tokio::spawn(async move {
            tracing::info!(interval_ms = interval.as_millis() as u64, "scan loop started");

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if *stop_signal.lock().await {
                    break;
                }

                let Some(generation) = cycle.lock().await.begin_frame() else {
                    continue;
                };

                if source.is_exhausted() {
                    tracing::info!("frame source exhausted");
                    break;
                }

                let src = Arc::clone(&source);
                let captured = match tokio::task::spawn_blocking(move || src.capture()).await {
                    Ok(Ok(Some(frame))) => frame,
                    Ok(Ok(None)) => continue,
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "capture failed, skipping frame");
                        continue;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "capture task failed");
                        continue;
                    }
                };

                let entry = scan_frame(&captured);

                let mut state = cycle.lock().await;
                let (next, verdict) = std::mem::take(&mut *state).on_frame(generation, entry);
                *state = next;

                match verdict {
                    FrameVerdict::Accepted => {
                        tracing::info!(
                            price = %state.draft().price,
                            name = %state.draft().name,
                            "price found, paused for review"
                        );
                        phase_tx.send_replace(ScanPhase::PausedForReview);
                    }
                    FrameVerdict::Stale => {
                        tracing::debug!(generation, "discarded stale frame");
                    }
                    FrameVerdict::NoResult => {}
                }
            }

            tracing::info!("scan loop stopped");
        })
    }
}
