//! JSON-file tour repository
//!
//! One pretty-printed JSON document per tour under a base directory, named
//! by tour id. Serialization shape matches the wire contract of the editor:
//! `{id, title, description, steps: [...], lastModified}`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::{PersistError, TourRepository};
use crate::tour::Tour;

pub struct JsonTourRepository {
    base_dir: PathBuf,
}

impl JsonTourRepository {
    /// Open a repository rooted at `base_dir`, creating the directory when
    /// missing.
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn tour_path(&self, tour_id: Uuid) -> PathBuf {
        self.base_dir.join(format!("{tour_id}.json"))
    }

    /// Ids of every tour stored under the base directory.
    pub fn list(&self) -> Result<Vec<Uuid>, PersistError> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if let Ok(id) = Uuid::parse_str(stem) {
                        ids.push(id);
                    }
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl TourRepository for JsonTourRepository {
    async fn save(&self, tour: &Tour) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(tour)?;
        tokio::fs::write(self.tour_path(tour.id), json).await?;
        log::debug!("tour {} saved to {}", tour.id, self.base_dir.display());
        Ok(())
    }

    async fn load(&self, tour_id: Uuid) -> Result<Tour, PersistError> {
        let path = self.tour_path(tour_id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistError::NotFound(tour_id));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }
}
