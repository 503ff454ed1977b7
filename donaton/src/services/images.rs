//! Garment and profile photos stored under the media root

use crate::error::Error;
use donaton_di::abstraction;
use std::{
    fs,
    path::{Component, Path, PathBuf}
};

/// Stores images and builds their public URLs
pub trait ImageService: Send + Sync {
    /// Stores the image at the relative `path` and returns that path
    ///
    /// # Errors
    /// - [`Error::Validation`] if `path` is empty or escapes the media root
    /// - [`Error::Io`] if the file can't be written
    fn upload_image(&self, content: &[u8], path: &str) -> Result<String, Error>;

    /// Deletes the image, returns `false` if there was no such image
    fn delete_image(&self, path: &str) -> bool;

    /// Returns the public URL of the image, or an empty string for an empty path
    fn image_url(&self, path: &str) -> String;
}

/// [`ImageService`] that writes images to the local file system
#[derive(Debug, Clone)]
pub struct LocalImageService {
    media_root: PathBuf,
    media_url: String,
}

impl LocalImageService {
    /// Creates a service that stores files under `media_root` and serves them from `media_url`
    pub fn new(media_root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
        Self {
            media_root: media_root.into(),
            media_url: media_url.into(),
        }
    }

    /// Returns the folder images are stored in
    #[inline]
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Maps a relative image path to a file under the media root
    fn locate(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path);
        let is_relative = !path.is_empty() && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        is_relative.then(|| self.media_root.join(relative))
    }
}

impl ImageService for LocalImageService {
    fn upload_image(&self, content: &[u8], path: &str) -> Result<String, Error> {
        let file = self.locate(path)
            .ok_or_else(|| Error::validation(format!("invalid image path: {path:?}")))?;
        if let Some(folder) = file.parent() {
            fs::create_dir_all(folder)?;
        }
        fs::write(&file, content)?;

        tracing::debug!("image stored at {}", file.display());
        Ok(path.into())
    }

    fn delete_image(&self, path: &str) -> bool {
        let Some(file) = self.locate(path) else {
            return false;
        };
        match fs::remove_file(&file) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!("unable to delete {}: {err}", file.display());
                false
            }
        }
    }

    fn image_url(&self, path: &str) -> String {
        if path.is_empty() {
            String::new()
        } else {
            format!("{}{path}", self.media_url)
        }
    }
}

abstraction!(dyn ImageService => LocalImageService);
