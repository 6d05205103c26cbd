//! Highlight region selector
//!
//! Two-phase pointer gesture over a full-viewport overlay: press records the
//! anchor, every move renormalizes the draft rectangle, release finalizes it
//! and tears the overlay down. The overlay is a singleton; activating while
//! one is live tears the old one down first. The target step is bound at
//! activation, not read back at delivery time.

use crate::tour::{Rect, StepId};

struct Overlay {
    step: StepId,
    anchor: Option<(f64, f64)>,
    draft: Option<Rect>,
}

pub struct RegionSelector {
    overlay: Option<Overlay>,
}

impl RegionSelector {
    pub fn new() -> Self {
        Self { overlay: None }
    }

    /// Whether an overlay is currently live.
    pub fn is_active(&self) -> bool {
        self.overlay.is_some()
    }

    /// Step the live overlay is bound to.
    pub fn active_step(&self) -> Option<StepId> {
        self.overlay.as_ref().map(|o| o.step)
    }

    /// Current draft rectangle, if a drag is in progress.
    pub fn draft(&self) -> Option<Rect> {
        self.overlay.as_ref().and_then(|o| o.draft)
    }

    /// Create the overlay bound to `step`. An existing overlay is torn down
    /// first, discarding its gesture.
    pub fn activate(&mut self, step: StepId) {
        if self.overlay.is_some() {
            log::debug!("replacing live highlight overlay");
            self.overlay = None;
        }
        self.overlay = Some(Overlay {
            step,
            anchor: None,
            draft: None,
        });
    }

    /// Pointer press: record the anchor and start a zero-size draft there.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.anchor = Some((x, y));
            overlay.draft = Some(Rect::from_corners((x, y), (x, y)));
        }
    }

    /// Pointer move: renormalize the draft against the anchor so any drag
    /// direction yields a non-negative rectangle.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some(overlay) = self.overlay.as_mut() {
            if let Some(anchor) = overlay.anchor {
                overlay.draft = Some(Rect::from_corners(anchor, (x, y)));
            }
        }
    }

    /// Pointer release: finalize the rectangle, tear down the overlay and
    /// hand back the region bound to the activating step. A release without
    /// a preceding press leaves the overlay up and yields nothing.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<(StepId, Rect)> {
        let overlay = self.overlay.as_mut()?;
        let anchor = overlay.anchor?;
        let rect = Rect::from_corners(anchor, (x, y));
        let step = overlay.step;
        self.overlay = None;
        Some((step, rect))
    }

    /// Tear down the overlay without emitting a result.
    pub fn cancel(&mut self) {
        self.overlay = None;
    }
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::Step;

    fn step_id() -> StepId {
        Step::new(1, "s".into(), String::new()).id
    }

    #[test]
    fn reverse_drag_yields_normalized_rect() {
        let mut selector = RegionSelector::new();
        let step = step_id();
        selector.activate(step);

        selector.pointer_down(50.0, 50.0);
        selector.pointer_move(30.0, 20.0);
        selector.pointer_move(10.0, 10.0);
        let (bound, rect) = selector.pointer_up(10.0, 10.0).unwrap();

        assert_eq!(bound, step);
        assert_eq!(
            rect,
            Rect {
                x: 10.0,
                y: 10.0,
                width: 40.0,
                height: 40.0
            }
        );
        assert!(!selector.is_active());
    }

    #[test]
    fn draft_tracks_every_move() {
        let mut selector = RegionSelector::new();
        selector.activate(step_id());
        selector.pointer_down(0.0, 0.0);
        assert_eq!(selector.draft().unwrap().width, 0.0);

        selector.pointer_move(5.0, 8.0);
        let draft = selector.draft().unwrap();
        assert_eq!((draft.width, draft.height), (5.0, 8.0));
    }

    #[test]
    fn click_without_drag_finalizes_degenerate_rect() {
        let mut selector = RegionSelector::new();
        selector.activate(step_id());
        selector.pointer_down(25.0, 40.0);
        let (_, rect) = selector.pointer_up(25.0, 40.0).unwrap();
        assert!(rect.is_degenerate());
        assert_eq!((rect.x, rect.y), (25.0, 40.0));
    }

    #[test]
    fn cancel_tears_down_without_result() {
        let mut selector = RegionSelector::new();
        selector.activate(step_id());
        selector.pointer_down(1.0, 1.0);
        selector.cancel();

        assert!(!selector.is_active());
        assert!(selector.pointer_up(9.0, 9.0).is_none());
    }

    #[test]
    fn reactivation_replaces_live_overlay_and_binding() {
        let mut selector = RegionSelector::new();
        let first = step_id();
        let second = step_id();

        selector.activate(first);
        selector.pointer_down(1.0, 1.0);
        selector.activate(second);

        // Old gesture is gone; the new overlay has no anchor yet.
        assert!(selector.pointer_up(2.0, 2.0).is_none());
        assert_eq!(selector.active_step(), Some(second));

        selector.pointer_down(0.0, 0.0);
        let (bound, _) = selector.pointer_up(3.0, 3.0).unwrap();
        assert_eq!(bound, second);
    }

    #[test]
    fn release_without_press_keeps_overlay_live() {
        let mut selector = RegionSelector::new();
        selector.activate(step_id());
        assert!(selector.pointer_up(5.0, 5.0).is_none());
        assert!(selector.is_active());
    }

    #[test]
    fn pointer_events_without_overlay_are_ignored() {
        let mut selector = RegionSelector::new();
        selector.pointer_down(1.0, 1.0);
        selector.pointer_move(2.0, 2.0);
        assert!(selector.pointer_up(3.0, 3.0).is_none());
    }
}
