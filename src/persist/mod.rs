//! Tour persistence
//!
//! The editor saves a tour as one aggregate, never per step. The repository
//! is an injected collaborator so the engine stays testable without a real
//! backend; this crate ships a JSON-file implementation plus an in-memory
//! one for tests and demos.

pub mod json;

pub use json::JsonTourRepository;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

use crate::tour::Tour;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("tour not found: {0}")]
    NotFound(Uuid),
    #[error("tour storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("tour serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait TourRepository: Send + Sync {
    /// Persist the whole tour, replacing any prior version.
    async fn save(&self, tour: &Tour) -> Result<(), PersistError>;

    /// Load a tour by id, or `NotFound`.
    async fn load(&self, tour_id: Uuid) -> Result<Tour, PersistError>;
}

/// Map-backed repository. Keeps everything in process memory; handy for
/// tests and the demo command.
pub struct MemoryTourRepository {
    tours: Mutex<HashMap<Uuid, Tour>>,
}

impl MemoryTourRepository {
    pub fn new() -> Self {
        Self {
            tours: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryTourRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TourRepository for MemoryTourRepository {
    async fn save(&self, tour: &Tour) -> Result<(), PersistError> {
        let mut tours = self.tours.lock().expect("repository lock poisoned");
        tours.insert(tour.id, tour.clone());
        Ok(())
    }

    async fn load(&self, tour_id: Uuid) -> Result<Tour, PersistError> {
        let tours = self.tours.lock().expect("repository lock poisoned");
        tours
            .get(&tour_id)
            .cloned()
            .ok_or(PersistError::NotFound(tour_id))
    }
}
