pub mod capture;
pub mod editor;
pub mod media;
pub mod persist;
pub mod tour;

// Re-export common items
pub use editor::TourEditorController;
pub use persist::JsonTourRepository;
pub use tour::{PreviewNavigator, Rect, Recording, Step, StepId, StepStore, Tour};
