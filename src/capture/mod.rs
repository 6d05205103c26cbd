//! Screen-capture pipeline
//!
//! The recorder wraps a capture device behind the [`CaptureDevice`] trait and
//! drives it through a permission/record/finalize state machine. Captured
//! chunks arrive periodically on a background collector task and are
//! assembled into one [`crate::tour::Recording`] when the session stops.

pub mod recorder;
pub mod synthetic;
pub mod traits;

pub use recorder::{RecorderState, RecordingController};
pub use synthetic::SyntheticCaptureDevice;
pub use traits::{CaptureDevice, CaptureStream, StopSignal};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    /// A session is already active; the capture device is a singleton.
    #[error("a recording session is already active")]
    Busy,
    #[error("screen capture permission denied")]
    PermissionDenied,
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
}
