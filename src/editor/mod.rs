//! Tour editor controller
//!
//! Composes the step store, recording controller, region selector and
//! preview into the command surface a client binds its UI against. The
//! controller is the single owner of "current selection" and of the tour
//! aggregate; collaborators receive step bindings as explicit parameters at
//! activation time instead of reading selection back later.

pub mod events;
pub mod highlight;

pub use events::{EditorEvent, EventEmitter};
pub use highlight::RegionSelector;

use anyhow::Context;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::capture::{CaptureDevice, CaptureError, RecorderState, RecordingController};
use crate::media::ImageSource;
use crate::persist::{PersistError, TourRepository};
use crate::tour::{
    PreviewNavigator, Recording, Step, StepField, StepId, StepStore, StoreError, StoreEvent, Tour,
};

pub struct TourEditorController {
    tour_id: Uuid,
    title: String,
    description: String,
    last_modified: DateTime<Utc>,
    store: StepStore,
    selected: Option<StepId>,
    recorder: RecordingController,
    ready_rx: mpsc::UnboundedReceiver<Recording>,
    selector: RegionSelector,
    repository: Arc<dyn TourRepository>,
    images: Arc<dyn ImageSource>,
    events: EventEmitter,
}

impl TourEditorController {
    /// Start editing a fresh, empty tour.
    pub fn new(
        title: impl Into<String>,
        device: Arc<dyn CaptureDevice>,
        repository: Arc<dyn TourRepository>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        Self::from_tour(Tour::new(title), device, repository, images)
    }

    /// Open a persisted tour and hydrate the step store from it.
    pub async fn open(
        tour_id: Uuid,
        device: Arc<dyn CaptureDevice>,
        repository: Arc<dyn TourRepository>,
        images: Arc<dyn ImageSource>,
    ) -> Result<Self, PersistError> {
        let tour = repository.load(tour_id).await?;
        Ok(Self::from_tour(tour, device, repository, images))
    }

    fn from_tour(
        tour: Tour,
        device: Arc<dyn CaptureDevice>,
        repository: Arc<dyn TourRepository>,
        images: Arc<dyn ImageSource>,
    ) -> Self {
        let (recorder, ready_rx) = RecordingController::new(device);
        let (events, _) = EventEmitter::new();
        let mut store = StepStore::new();
        if !tour.steps.is_empty() {
            store.hydrate(tour.steps);
        }
        Self {
            tour_id: tour.id,
            title: tour.title,
            description: tour.description,
            last_modified: tour.last_modified,
            store,
            selected: None,
            recorder,
            ready_rx,
            selector: RegionSelector::new(),
            repository,
            images,
            events,
        }
    }

    // --- introspection -----------------------------------------------------

    pub fn tour_id(&self) -> Uuid {
        self.tour_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn steps(&self) -> &[Step] {
        self.store.steps()
    }

    pub fn selected(&self) -> Option<StepId> {
        self.selected
    }

    pub fn recording_state(&self) -> RecorderState {
        self.recorder.state()
    }

    /// Editor-level event feed (selection, recording lifecycle, saves).
    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }

    /// Step store change feed (structural and field mutations).
    pub fn subscribe_store(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    // --- step commands -----------------------------------------------------

    /// Append a new step with a default title and select it.
    pub fn add_step(&mut self) -> StepId {
        let title = format!("Step {}", self.store.len() + 1);
        let step = self.store.append(title, "");
        self.set_selection(Some(step.id));
        step.id
    }

    /// Remove a step. If it was selected, selection falls to the first
    /// remaining step, or clears when the tour is now empty.
    pub fn delete_step(&mut self, id: StepId) -> Result<(), StoreError> {
        self.store.remove(id)?;
        if self.selected == Some(id) {
            let next = self.store.steps().first().map(|s| s.id);
            self.set_selection(next);
        }
        Ok(())
    }

    pub fn select_step(&mut self, id: StepId) -> Result<(), StoreError> {
        self.store.find(id)?;
        self.set_selection(Some(id));
        Ok(())
    }

    pub fn reorder_step(&mut self, moved: StepId, target: StepId) -> Result<(), StoreError> {
        self.store.reorder(moved, target)
    }

    pub fn update_step(&mut self, id: StepId, field: StepField) -> Result<(), StoreError> {
        self.store.update(id, field)
    }

    /// Explicit field clear, independent of the capture flows.
    pub fn clear_highlight(&mut self, id: StepId) -> Result<(), StoreError> {
        self.store.update(id, StepField::Highlight(None))
    }

    /// Explicit field clear, independent of the capture flows.
    pub fn clear_recording(&mut self, id: StepId) -> Result<(), StoreError> {
        self.store.update(id, StepField::Recording(None))
    }

    /// Read a local image file and store the resulting embeddable reference
    /// on the step.
    pub async fn attach_screenshot(&mut self, id: StepId, path: &Path) -> anyhow::Result<()> {
        self.store.find(id)?;
        let image = self
            .images
            .read_image(path)
            .await
            .with_context(|| format!("failed to read screenshot {}", path.display()))?;
        self.store.update(id, StepField::Screenshot(Some(image)))?;
        Ok(())
    }

    // --- highlight capture -------------------------------------------------

    /// Open the highlight overlay bound to `step_id`. The binding is fixed
    /// here; later selection changes do not affect where the region lands.
    pub fn start_highlight(&mut self, step_id: StepId) -> Result<(), StoreError> {
        self.store.find(step_id)?;
        self.selector.activate(step_id);
        Ok(())
    }

    pub fn highlight_pointer_down(&mut self, x: f64, y: f64) {
        self.selector.pointer_down(x, y);
    }

    pub fn highlight_pointer_move(&mut self, x: f64, y: f64) {
        self.selector.pointer_move(x, y);
    }

    /// Finish the gesture. The rectangle is written to the activating step;
    /// if that step was deleted mid-gesture the delivery is dropped.
    pub fn highlight_pointer_up(&mut self, x: f64, y: f64) {
        if let Some((step, rect)) = self.selector.pointer_up(x, y) {
            match self.store.update(step, StepField::Highlight(Some(rect))) {
                Ok(()) => self.events.emit(EditorEvent::HighlightCaptured { step }),
                Err(StoreError::NotFound(_)) => {
                    log::warn!("highlight target {step} removed during gesture; region dropped");
                }
            }
        }
    }

    pub fn cancel_highlight(&mut self) {
        self.selector.cancel();
    }

    // --- recording ---------------------------------------------------------

    pub async fn start_recording(&mut self) -> Result<(), CaptureError> {
        match self.recorder.start().await {
            Ok(()) => {
                self.events.emit(EditorEvent::RecordingStarted);
                Ok(())
            }
            Err(err) => {
                self.events.emit(EditorEvent::RecordingFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Stop the active session and deliver its recording. No-op while not
    /// recording.
    pub async fn stop_recording(&mut self) {
        self.recorder.stop().await;
        self.pump_recordings();
    }

    /// Drain ready recordings and attach each to the step selected at its
    /// delivery time. With no selection the artifact is announced but not
    /// attached anywhere.
    pub fn pump_recordings(&mut self) {
        while let Ok(recording) = self.ready_rx.try_recv() {
            let attached_to = match self.selected {
                Some(id) => match self
                    .store
                    .update(id, StepField::Recording(Some(recording)))
                {
                    Ok(()) => Some(id),
                    Err(StoreError::NotFound(_)) => {
                        log::warn!("selected step {id} vanished before recording delivery");
                        None
                    }
                },
                None => None,
            };
            self.events.emit(EditorEvent::RecordingReady { attached_to });
        }
    }

    // --- preview and persistence -------------------------------------------

    /// Open a read-only preview over the current sequence.
    pub fn preview(&self) -> PreviewNavigator {
        PreviewNavigator::open(&self.store)
    }

    fn assemble_tour(&self, last_modified: DateTime<Utc>) -> Tour {
        Tour {
            id: self.tour_id,
            title: self.title.clone(),
            description: self.description.clone(),
            steps: self.store.snapshot(),
            last_modified,
        }
    }

    /// Persist the whole tour. On failure local state is kept untouched for
    /// a manual retry; there is no automatic retry.
    pub async fn save(&mut self) -> Result<DateTime<Utc>, PersistError> {
        let now = Utc::now();
        let tour = self.assemble_tour(now);
        match self.repository.save(&tour).await {
            Ok(()) => {
                self.last_modified = now;
                self.events.emit(EditorEvent::TourSaved { at: now });
                Ok(now)
            }
            Err(err) => {
                self.events.emit(EditorEvent::SaveFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn set_selection(&mut self, selected: Option<StepId>) {
        if self.selected != selected {
            self.selected = selected;
            self.events.emit(EditorEvent::SelectionChanged { selected });
        }
    }
}
