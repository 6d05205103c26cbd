//! Editor change-notification feed
//!
//! Views subscribe here to re-render after selection changes, recording
//! lifecycle transitions, highlight captures and saves. Structural step
//! changes additionally go out on the step store's own feed.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::tour::StepId;

#[derive(Debug, Clone)]
pub enum EditorEvent {
    SelectionChanged {
        selected: Option<StepId>,
    },
    RecordingStarted,
    RecordingFailed {
        reason: String,
    },
    /// A finished recording arrived. `attached_to` is `None` when no step
    /// was selected at delivery time; the artifact is then kept nowhere.
    RecordingReady {
        attached_to: Option<StepId>,
    },
    HighlightCaptured {
        step: StepId,
    },
    TourSaved {
        at: DateTime<Utc>,
    },
    SaveFailed {
        reason: String,
    },
}

/// Emitter broadcasting editor events to any number of subscribers.
pub struct EventEmitter {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<EditorEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: EditorEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }
}
