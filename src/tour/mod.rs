//! Core tour data model
//!
//! A tour is an ordered sequence of steps; each step may carry a screenshot
//! reference, a highlight rectangle and a screen recording. The tour is the
//! unit of persistence - steps are never saved individually.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod preview;
pub mod store;

pub use preview::PreviewNavigator;
pub use store::{StepField, StepStore, StoreError, StoreEvent};

/// Opaque step identifier. Minted once per step and never reused, so stale
/// references from delayed deliveries (recordings, highlights) can be
/// detected instead of landing on the wrong step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(Uuid);

impl StepId {
    pub(crate) fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalized viewport rectangle. Width and height are never negative; a
/// zero-size rect (a click without a drag) is a valid degenerate value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Build a rect from a gesture anchor and the current pointer position.
    /// Origin is the per-axis minimum, size the per-axis absolute delta, so
    /// any drag direction yields a valid rect.
    pub fn from_corners(anchor: (f64, f64), current: (f64, f64)) -> Self {
        Self {
            x: anchor.0.min(current.0),
            y: anchor.1.min(current.1),
            width: (current.0 - anchor.0).abs(),
            height: (current.1 - anchor.1).abs(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Embeddable screenshot reference (data URI plus probed pixel size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub uri: String,
    pub width: u32,
    pub height: u32,
}

/// A finalized screen-capture artifact. Duration is the wall-clock time the
/// device was recording, not a chunk count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
    pub size_bytes: u64,
}

/// One entry in a tour's ordered sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: StepId,
    /// 1-based position, kept dense by the store after every structural
    /// change.
    pub order: u32,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_region: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<Recording>,
}

impl Step {
    pub(crate) fn new(order: u32, title: String, description: String) -> Self {
        Self {
            id: StepId::mint(),
            order,
            title,
            description,
            screenshot: None,
            highlight_region: None,
            recording: None,
        }
    }
}

/// The persistence aggregate: all steps in order plus tour metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<Step>,
    pub last_modified: DateTime<Utc>,
}

impl Tour {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            steps: Vec::new(),
            last_modified: Utc::now(),
        }
    }
}

/// Serde adapter storing recording payloads as base64 strings.
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
