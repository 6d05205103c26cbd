//! Synthetic capture device
//!
//! Grants immediately and produces deterministic pseudo-frame chunks at a
//! fixed interval. Stands in for a real display-capture backend in the demo
//! command and in tests that need a granting device.

use async_trait::async_trait;
use std::time::Duration;

use super::traits::{CaptureDevice, CaptureStream, StopSignal};
use super::CaptureError;

pub struct SyntheticCaptureDevice {
    chunk_len: usize,
    interval: Duration,
}

impl SyntheticCaptureDevice {
    pub fn new(chunk_len: usize, interval: Duration) -> Self {
        Self {
            chunk_len,
            interval,
        }
    }
}

impl Default for SyntheticCaptureDevice {
    fn default() -> Self {
        // One chunk per second, matching the cadence a media recorder is
        // typically configured with.
        Self::new(4096, Duration::from_secs(1))
    }
}

#[async_trait]
impl CaptureDevice for SyntheticCaptureDevice {
    async fn acquire(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        Ok(Box::new(SyntheticStream {
            seq: 0,
            chunk_len: self.chunk_len,
            interval: self.interval,
            stop: StopSignal::new(),
            released: false,
        }))
    }
}

struct SyntheticStream {
    seq: u8,
    chunk_len: usize,
    interval: Duration,
    stop: StopSignal,
    released: bool,
}

#[async_trait]
impl CaptureStream for SyntheticStream {
    async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        if self.stop.is_stopped() {
            return None;
        }
        tokio::select! {
            _ = tokio::time::sleep(self.interval) => {
                let chunk = vec![self.seq; self.chunk_len];
                self.seq = self.seq.wrapping_add(1);
                Some(chunk)
            }
            _ = self.stop.stopped() => None,
        }
    }

    fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    async fn release(&mut self) {
        self.released = true;
        log::debug!("synthetic capture stream released after {} chunks", self.seq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_chunks_until_stopped() {
        let device = SyntheticCaptureDevice::new(8, Duration::from_millis(2));
        let mut stream = device.acquire().await.unwrap();
        let stop = stream.stop_signal();

        let first = stream.next_chunk().await.unwrap();
        let second = stream.next_chunk().await.unwrap();
        assert_eq!(first.len(), 8);
        assert_ne!(first, second);

        stop.stop();
        assert!(stream.next_chunk().await.is_none());
        stream.release().await;
    }
}
