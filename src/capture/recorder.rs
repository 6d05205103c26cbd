//! Recording state machine
//!
//! `Idle -> Requesting -> Recording -> Stopping -> Finalizing -> Idle`, with
//! the error edge `Requesting -> Idle` when the device cannot be acquired.
//! Chunks are collected on a spawned task so the control thread never blocks
//! on the device; stopping drains whatever was captured, releases the device,
//! and only then posts the finished recording on the ready channel.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::traits::{CaptureDevice, CaptureStream, StopSignal};
use super::CaptureError;
use crate::tour::Recording;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Requesting,
    Recording,
    Stopping,
    Finalizing,
}

struct CaptureSession {
    started_at: Instant,
    captured_at: DateTime<Utc>,
    stop: StopSignal,
    /// Resolves with the collected chunks once the stream is drained and the
    /// device released.
    collector: JoinHandle<Vec<Vec<u8>>>,
}

/// Drives one capture device through at most one session at a time.
///
/// The controller does not know which step a finished recording belongs to;
/// it only posts the artifact on the ready channel handed out at
/// construction.
pub struct RecordingController {
    device: Arc<dyn CaptureDevice>,
    state: RecorderState,
    session: Option<CaptureSession>,
    ready_tx: mpsc::UnboundedSender<Recording>,
}

impl RecordingController {
    /// Create a controller plus the receiving end of its "recording ready"
    /// notifications.
    pub fn new(device: Arc<dyn CaptureDevice>) -> (Self, mpsc::UnboundedReceiver<Recording>) {
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        (
            Self {
                device,
                state: RecorderState::Idle,
                session: None,
                ready_tx,
            },
            ready_rx,
        )
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Begin a capture session. Rejected while any session is active; on
    /// acquisition failure the controller returns to `Idle` and no recording
    /// is produced.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.state != RecorderState::Idle {
            return Err(CaptureError::Busy);
        }

        self.state = RecorderState::Requesting;
        let mut stream = match self.device.acquire().await {
            Ok(stream) => stream,
            Err(err) => {
                log::warn!("capture device not acquired: {err}");
                self.state = RecorderState::Idle;
                return Err(err);
            }
        };

        let stop = stream.stop_signal();
        let collector = tokio::spawn(async move {
            let mut chunks = Vec::new();
            while let Some(chunk) = stream.next_chunk().await {
                chunks.push(chunk);
            }
            // Release before handing the chunks back, so no device handle
            // outlives the transition into finalization.
            stream.release().await;
            chunks
        });

        self.session = Some(CaptureSession {
            started_at: Instant::now(),
            captured_at: Utc::now(),
            stop,
            collector,
        });
        self.state = RecorderState::Recording;
        log::info!("recording started");
        Ok(())
    }

    /// End the active session. No-op unless currently recording. Chunks
    /// pushed before the stop are kept; the ready notification fires strictly
    /// after the device was released.
    pub async fn stop(&mut self) {
        if self.state != RecorderState::Recording {
            return;
        }
        let Some(session) = self.session.take() else {
            self.state = RecorderState::Idle;
            return;
        };

        self.state = RecorderState::Stopping;
        session.stop.stop();
        let chunks = match session.collector.await {
            Ok(chunks) => chunks,
            Err(err) => {
                log::error!("chunk collector failed: {err}");
                Vec::new()
            }
        };

        self.state = RecorderState::Finalizing;
        let duration_ms = session.started_at.elapsed().as_millis() as u64;
        let payload: Vec<u8> = chunks.concat();
        let recording = Recording {
            id: Uuid::new_v4(),
            captured_at: session.captured_at,
            duration_ms,
            size_bytes: payload.len() as u64,
            payload,
        };
        log::info!(
            "recording finalized: {} bytes over {} ms",
            recording.size_bytes,
            recording.duration_ms
        );

        // Receiver may already be gone during shutdown; the artifact is then
        // simply discarded.
        let _ = self.ready_tx.send(recording);
        self.state = RecorderState::Idle;
    }
}
