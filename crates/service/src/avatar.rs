//! Avatar processing: uploaded images are normalized to a fixed 250x250
//! PNG and dropped into the served avatars directory.
//!
//! Decode/resize/encode is CPU work and runs under `spawn_blocking` so it
//! never stalls the async runtime.

use std::path::PathBuf;

use image::imageops::FilterType;
use image::GenericImageView;
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;

pub const AVATAR_SIZE: u32 = 250;

/// Writes processed avatars into a directory that the HTTP layer serves
/// statically under `/avatars`.
#[derive(Clone)]
pub struct AvatarStore {
    dir: PathBuf,
}

impl AvatarStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Decode the uploaded bytes, resize to the fixed square, store as
    /// `<user_id>.png` and return the public path. Re-uploading overwrites
    /// the previous avatar.
    pub async fn store(&self, user_id: Uuid, bytes: Vec<u8>) -> Result<String, ServiceError> {
        let filename = format!("{user_id}.png");
        let path = self.dir.join(&filename);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(ServiceError::storage)?;

        tokio::task::spawn_blocking(move || -> Result<(), ServiceError> {
            let img = image::load_from_memory(&bytes)
                .map_err(|e| ServiceError::Validation(format!("invalid image: {e}")))?;
            let (width, height) = img.dimensions();
            debug!(width, height, "processing avatar upload");
            let resized = img.resize_exact(AVATAR_SIZE, AVATAR_SIZE, FilterType::Triangle);
            resized
                .save_with_format(&path, image::ImageFormat::Png)
                .map_err(ServiceError::storage)?;
            Ok(())
        })
        .await
        .map_err(ServiceError::storage)??;

        Ok(format!("/avatars/{filename}"))
    }
}
