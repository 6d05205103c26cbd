//! Ordered step store
//!
//! Owns the step entities of the tour being edited. Every structural change
//! (append, remove, reorder, hydrate) renumbers the sequence so that `order`
//! values are exactly 1..=N in iteration position. Mutations are broadcast
//! to subscribers so list and detail views can re-render.

use thiserror::Error;
use tokio::sync::broadcast;

use super::{ImageRef, Recording, Rect, Step, StepId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("step not found: {0}")]
    NotFound(StepId),
}

/// Change notification emitted after every completed mutation.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Appended { id: StepId },
    Removed { id: StepId },
    Reordered { moved: StepId, target: StepId },
    Updated { id: StepId },
    Hydrated,
}

/// Partial step mutation. Clearing an annotation is an explicit update with
/// `None`, not a side effect of any other flow.
#[derive(Debug, Clone)]
pub enum StepField {
    Title(String),
    Description(String),
    Screenshot(Option<ImageRef>),
    Highlight(Option<Rect>),
    Recording(Option<Recording>),
}

/// Single-writer store over the ordered step sequence.
///
/// The editor controller is the only writer, so mutations need no locking;
/// each method leaves the dense-order invariant re-established before it
/// returns (and before the change event goes out).
pub struct StepStore {
    steps: Vec<Step>,
    events: broadcast::Sender<StoreEvent>,
}

impl StepStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            steps: Vec::new(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Point-in-time copy of the sequence, used for previews and saves.
    pub fn snapshot(&self) -> Vec<Step> {
        self.steps.clone()
    }

    pub fn find(&self, id: StepId) -> Result<&Step, StoreError> {
        self.steps
            .iter()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Append a new step at the end of the sequence with a freshly minted id.
    pub fn append(&mut self, title: impl Into<String>, description: impl Into<String>) -> Step {
        let step = Step::new(self.steps.len() as u32 + 1, title.into(), description.into());
        self.steps.push(step.clone());
        self.emit(StoreEvent::Appended { id: step.id });
        step
    }

    /// Remove a step and renumber the survivors. Relative order of the
    /// remaining steps is untouched.
    pub fn remove(&mut self, id: StepId) -> Result<Step, StoreError> {
        let index = self.position(id)?;
        let removed = self.steps.remove(index);
        self.renumber();
        self.emit(StoreEvent::Removed { id });
        Ok(removed)
    }

    /// Move `moved_id` into the slot `target_id` occupied before the move.
    /// This is a relocation, not a swap; equal ids are a no-op.
    pub fn reorder(&mut self, moved_id: StepId, target_id: StepId) -> Result<(), StoreError> {
        if moved_id == target_id {
            return Ok(());
        }
        let moved_index = self.position(moved_id)?;
        let target_index = self.position(target_id)?;

        let moved = self.steps.remove(moved_index);
        self.steps.insert(target_index, moved);
        self.renumber();
        self.emit(StoreEvent::Reordered {
            moved: moved_id,
            target: target_id,
        });
        Ok(())
    }

    /// Apply a partial mutation to one step.
    pub fn update(&mut self, id: StepId, field: StepField) -> Result<(), StoreError> {
        let index = self.position(id)?;
        let step = &mut self.steps[index];
        match field {
            StepField::Title(title) => step.title = title,
            StepField::Description(description) => step.description = description,
            StepField::Screenshot(screenshot) => step.screenshot = screenshot,
            StepField::Highlight(highlight) => step.highlight_region = highlight,
            StepField::Recording(recording) => step.recording = recording,
        }
        self.emit(StoreEvent::Updated { id });
        Ok(())
    }

    /// Replace the whole sequence, e.g. when opening a persisted tour.
    pub fn hydrate(&mut self, steps: Vec<Step>) {
        self.steps = steps;
        self.renumber();
        self.emit(StoreEvent::Hydrated);
    }

    fn position(&self, id: StepId) -> Result<usize, StoreError> {
        self.steps
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn renumber(&mut self) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.order = index as u32 + 1;
        }
    }

    fn emit(&self, event: StoreEvent) {
        // Nobody listening is fine; views come and go.
        let _ = self.events.send(event);
    }
}

impl Default for StepStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_dense(store: &StepStore) {
        for (index, step) in store.steps().iter().enumerate() {
            assert_eq!(step.order, index as u32 + 1, "order not dense at {index}");
        }
    }

    #[test]
    fn append_assigns_next_order() {
        let mut store = StepStore::new();
        let first = store.append("Step 1", "");
        let second = store.append("Step 2", "");
        assert_eq!(first.order, 1);
        assert_eq!(second.order, 2);
        assert_ne!(first.id, second.id);
        assert_dense(&store);
    }

    #[test]
    fn remove_renumbers_and_preserves_relative_order() {
        let mut store = StepStore::new();
        let a = store.append("a", "");
        let b = store.append("b", "");
        let c = store.append("c", "");
        let d = store.append("d", "");

        store.remove(b.id).unwrap();

        let titles: Vec<&str> = store.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c", "d"]);
        assert_dense(&store);
        assert_eq!(store.find(a.id).unwrap().order, 1);
        assert_eq!(store.find(c.id).unwrap().order, 2);
        assert_eq!(store.find(d.id).unwrap().order, 3);
    }

    #[test]
    fn remove_unknown_id_fails() {
        let mut store = StepStore::new();
        store.append("a", "");
        let ghost = Step::new(1, "ghost".into(), String::new());
        assert_eq!(
            store.remove(ghost.id),
            Err(StoreError::NotFound(ghost.id))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reorder_moves_rather_than_swaps() {
        let mut store = StepStore::new();
        let a = store.append("a", "");
        store.append("b", "");
        let c = store.append("c", "");

        store.reorder(c.id, a.id).unwrap();

        let titles: Vec<&str> = store.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
        assert_dense(&store);
    }

    #[test]
    fn reorder_adjacent_pair_twice_restores_sequence() {
        let mut store = StepStore::new();
        let a = store.append("a", "");
        let b = store.append("b", "");
        store.append("c", "");

        store.reorder(a.id, b.id).unwrap();
        store.reorder(b.id, a.id).unwrap();

        let titles: Vec<&str> = store.steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_dense(&store);
    }

    #[test]
    fn reorder_same_id_is_noop() {
        let mut store = StepStore::new();
        let a = store.append("a", "");
        store.append("b", "");
        let mut rx = store.subscribe();

        store.reorder(a.id, a.id).unwrap();

        assert!(rx.try_recv().is_err());
        assert_eq!(store.steps()[0].id, a.id);
    }

    #[test]
    fn order_stays_dense_across_mixed_mutations() {
        let mut store = StepStore::new();
        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(store.append(format!("s{i}"), "").id);
            assert_dense(&store);
        }
        store.remove(ids[2]).unwrap();
        assert_dense(&store);
        store.reorder(ids[5], ids[0]).unwrap();
        assert_dense(&store);
        store.remove(ids[0]).unwrap();
        assert_dense(&store);
        store.reorder(ids[1], ids[4]).unwrap();
        assert_dense(&store);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn update_mutates_single_field() {
        let mut store = StepStore::new();
        let step = store.append("old", "desc");
        store
            .update(step.id, StepField::Title("new".into()))
            .unwrap();

        let found = store.find(step.id).unwrap();
        assert_eq!(found.title, "new");
        assert_eq!(found.description, "desc");

        store
            .update(step.id, StepField::Highlight(Some(Rect::default())))
            .unwrap();
        assert!(store.find(step.id).unwrap().highlight_region.is_some());

        // Clearing is an explicit None update.
        store.update(step.id, StepField::Highlight(None)).unwrap();
        assert!(store.find(step.id).unwrap().highlight_region.is_none());
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut store = StepStore::new();
        let ghost = Step::new(1, "ghost".into(), String::new());
        assert_eq!(
            store.update(ghost.id, StepField::Title("x".into())),
            Err(StoreError::NotFound(ghost.id))
        );
    }

    #[test]
    fn every_mutation_notifies_subscribers() {
        let mut store = StepStore::new();
        let mut rx = store.subscribe();

        let a = store.append("a", "");
        let b = store.append("b", "");
        store.update(a.id, StepField::Description("d".into())).unwrap();
        store.reorder(b.id, a.id).unwrap();
        store.remove(a.id).unwrap();

        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::Appended { id } if id == a.id));
        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::Appended { id } if id == b.id));
        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::Updated { id } if id == a.id));
        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::Reordered { .. }));
        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::Removed { id } if id == a.id));
    }

    #[test]
    fn hydrate_replaces_sequence_and_renumbers() {
        let mut store = StepStore::new();
        store.append("stale", "");

        let steps = vec![
            Step::new(9, "x".into(), String::new()),
            Step::new(4, "y".into(), String::new()),
        ];
        store.hydrate(steps);

        assert_eq!(store.len(), 2);
        assert_dense(&store);
        assert_eq!(store.steps()[0].title, "x");
    }
}
