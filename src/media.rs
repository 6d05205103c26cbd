//! Local image reading
//!
//! Turns a user-selected image file into an embeddable data-URI reference
//! with probed pixel dimensions, the shape the step model stores for
//! screenshots.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::GenericImageView;
use std::path::Path;

pub use crate::tour::ImageRef;

/// Collaborator that resolves an image path into an embeddable reference.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn read_image(&self, path: &Path) -> Result<ImageRef>;
}

/// Reads image files from the local filesystem.
pub struct LocalImageSource;

#[async_trait]
impl ImageSource for LocalImageSource {
    async fn read_image(&self, path: &Path) -> Result<ImageRef> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image file {}", path.display()))?;

        let format = image::guess_format(&bytes)
            .with_context(|| format!("unrecognized image format: {}", path.display()))?;
        let decoded = image::load_from_memory_with_format(&bytes, format)
            .with_context(|| format!("failed to decode image {}", path.display()))?;
        let (width, height) = decoded.dimensions();

        let uri = format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            STANDARD.encode(&bytes)
        );
        Ok(ImageRef { uri, width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = ImageBuffer::from_pixel(width, height, Rgba([10u8, 20, 30, 255]));
        img.save(path).unwrap();
    }

    #[tokio::test]
    async fn reads_png_into_data_uri_with_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        write_png(&path, 12, 8);

        let image = LocalImageSource.read_image(&path).await.unwrap();
        assert!(image.uri.starts_with("data:image/png;base64,"));
        assert_eq!((image.width, image.height), (12, 8));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");
        assert!(LocalImageSource.read_image(&path).await.is_err());
    }

    #[tokio::test]
    async fn non_image_payload_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(LocalImageSource.read_image(&path).await.is_err());
    }
}
