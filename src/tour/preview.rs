//! Read-only preview cursor
//!
//! Walks a point-in-time snapshot of the step sequence. Mutations made after
//! the preview was opened are not visible; re-opening is the only way to pick
//! them up.

use super::{Step, StepStore};

pub struct PreviewNavigator {
    steps: Vec<Step>,
    index: usize,
}

impl PreviewNavigator {
    /// Open a preview over the store's current sequence.
    pub fn open(store: &StepStore) -> Self {
        Self::from_steps(store.snapshot())
    }

    /// Open a preview over an already materialized sequence (e.g. a loaded
    /// tour that never went through a store).
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps, index: 0 }
    }

    pub fn current(&self) -> Option<&Step> {
        self.steps.get(self.index)
    }

    /// Advance one step, clamping at the last index. No wraparound.
    pub fn next(&mut self) -> Option<&Step> {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Step back, clamping at the first index.
    pub fn prev(&mut self) -> Option<&Step> {
        self.index = self.index.saturating_sub(1);
        self.current()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 1-based position label, e.g. "2 of 5". An empty preview reads
    /// "0 of 0".
    pub fn label(&self) -> String {
        if self.steps.is_empty() {
            "0 of 0".to_string()
        } else {
            format!("{} of {}", self.index + 1, self.steps.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(titles: &[&str]) -> StepStore {
        let mut store = StepStore::new();
        for title in titles {
            store.append(*title, "");
        }
        store
    }

    #[test]
    fn starts_at_first_step() {
        let store = store_with(&["a", "b", "c"]);
        let preview = PreviewNavigator::open(&store);
        assert_eq!(preview.index(), 0);
        assert_eq!(preview.current().unwrap().title, "a");
        assert_eq!(preview.label(), "1 of 3");
    }

    #[test]
    fn next_clamps_at_last_index() {
        let store = store_with(&["a", "b", "c"]);
        let mut preview = PreviewNavigator::open(&store);

        preview.next();
        preview.next();
        assert_eq!(preview.index(), 2);
        assert_eq!(preview.label(), "3 of 3");

        // One more call stays put.
        preview.next();
        assert_eq!(preview.index(), 2);
        assert_eq!(preview.label(), "3 of 3");
    }

    #[test]
    fn prev_clamps_at_first_index() {
        let store = store_with(&["a", "b"]);
        let mut preview = PreviewNavigator::open(&store);

        preview.prev();
        assert_eq!(preview.index(), 0);

        preview.next();
        preview.prev();
        preview.prev();
        assert_eq!(preview.current().unwrap().title, "a");
    }

    #[test]
    fn snapshot_ignores_later_mutations() {
        let mut store = store_with(&["a", "b"]);
        let preview = PreviewNavigator::open(&store);

        let c = store.append("c", "");
        store.remove(c.id).ok();
        store.append("d", "");

        assert_eq!(preview.len(), 2);
        // Re-opening picks up the new sequence.
        let reopened = PreviewNavigator::open(&store);
        assert_eq!(reopened.len(), 3);
    }

    #[test]
    fn empty_preview_labels_zero_of_zero() {
        let store = StepStore::new();
        let mut preview = PreviewNavigator::open(&store);
        assert_eq!(preview.label(), "0 of 0");
        assert!(preview.next().is_none());
        assert!(preview.prev().is_none());
    }
}
