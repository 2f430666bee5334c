//! Image uploads stored in a local directory.

use std::path::{Path, PathBuf};

use log::{debug, info};
use tokio::task;
use uuid::Uuid;

use crate::{
    error::{Result, SiteError},
    gateway::ImageUploader,
};

/// Extensions accepted for uploaded images.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// URL prefix uploaded files are served under.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Writes uploads into one directory under random names and hands back
/// `/uploads/<name>` URLs.
#[derive(Debug, Clone)]
pub struct DirectoryUploader {
    dir: PathBuf,
}

impl DirectoryUploader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lowercased extension of `file_name` if it names a supported image.
    fn image_extension(file_name: &str) -> Result<String> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Ok(extension)
        } else {
            Err(SiteError::Upload {
                message: format!(
                    "'{file_name}' is not an image (expected one of: {})",
                    IMAGE_EXTENSIONS.join(", ")
                ),
            })
        }
    }
}

impl ImageUploader for DirectoryUploader {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        let extension = Self::image_extension(file_name)?;
        if bytes.is_empty() {
            return Err(SiteError::Upload {
                message: format!("'{file_name}' is empty"),
            });
        }

        let name = format!("{}.{extension}", Uuid::new_v4().simple());
        let dir = self.dir.clone();
        let path = dir.join(&name);
        let bytes = bytes.to_vec();

        task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir).map_err(|e| SiteError::FileSystem {
                path: dir.clone(),
                source: e,
            })?;
            std::fs::write(&path, bytes).map_err(|e| SiteError::FileSystem {
                path: path.clone(),
                source: e,
            })
        })
        .await
        .map_err(SiteError::join)??;

        info!("Stored upload '{file_name}' as {name}");
        Ok(format!("{UPLOAD_URL_PREFIX}/{name}"))
    }

    async fn discard(&self, url: &str) -> Result<()> {
        let name = url
            .strip_prefix(UPLOAD_URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && name != &"..")
            .ok_or_else(|| SiteError::Upload {
                message: format!("'{url}' is not an upload URL"),
            })?;
        let path = self.dir.join(name);

        task::spawn_blocking(move || match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SiteError::FileSystem { path, source: e }),
        })
        .await
        .map_err(SiteError::join)??;

        debug!("Discarded upload {name}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_upload_writes_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let uploader = DirectoryUploader::new(temp_dir.path().join("uploads"));

        let url = uploader
            .upload("Putna.JPG", b"\xff\xd8\xff")
            .await
            .expect("upload failed");
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".jpg"));

        let name = url.trim_start_matches("/uploads/");
        let stored = std::fs::read(uploader.dir().join(name)).unwrap();
        assert_eq!(stored, b"\xff\xd8\xff");
    }

    #[tokio::test]
    async fn test_upload_rejects_non_images_and_empty_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let uploader = DirectoryUploader::new(temp_dir.path());

        let err = uploader.upload("notes.txt", b"hello").await.unwrap_err();
        assert!(matches!(err, SiteError::Upload { .. }));
        let err = uploader.upload("noextension", b"hello").await.unwrap_err();
        assert!(matches!(err, SiteError::Upload { .. }));
        let err = uploader.upload("empty.png", b"").await.unwrap_err();
        assert!(matches!(err, SiteError::Upload { .. }));

        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_discard_removes_the_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let uploader = DirectoryUploader::new(temp_dir.path());

        let url = uploader.upload("putna.png", b"\x89PNG").await.unwrap();
        uploader.discard(&url).await.expect("discard failed");
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);

        // Discarding twice is harmless; foreign URLs are refused.
        uploader.discard(&url).await.expect("second discard failed");
        assert!(uploader.discard("/uploads/../test.db").await.is_err());
        assert!(uploader.discard("https://cdn.example/x.png").await.is_err());
    }
}
