//! Configuration of [`Site`] instances.

use std::path::{Path, PathBuf};

use log::info;
use tokio::task;

use super::Site;
use crate::{
    db::Database,
    error::{Result, SiteError},
};

const XDG_PREFIX: &str = "pelerin";

/// Builder for [`Site`].
#[derive(Debug, Clone, Default)]
pub struct SiteBuilder {
    database_path: Option<PathBuf>,
    upload_dir: Option<PathBuf>,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses `$XDG_DATA_HOME/pelerin/pelerin.db` or
    /// `~/.local/share/pelerin/pelerin.db`.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the directory uploaded images are written to.
    ///
    /// Defaults to `uploads/` next to the database file.
    pub fn with_upload_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        if let Some(dir) = dir {
            self.upload_dir = Some(dir.as_ref().to_path_buf());
        }
        self
    }

    /// Creates missing directories, initializes the schema and returns the
    /// site.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::FileSystem` if the database directory cannot be
    /// created, `SiteError::XdgDirectory` if no default location can be
    /// determined and `SiteError::Database` if schema setup fails.
    pub async fn build(self) -> Result<Site> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };
        let upload_dir = self
            .upload_dir
            .unwrap_or_else(|| Self::default_upload_dir(&db_path));

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SiteError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), SiteError>(())
        })
        .await
        .map_err(SiteError::join)??;

        info!("Opened site database at {}", db_path.display());
        Ok(Site::new(db_path, upload_dir))
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix(XDG_PREFIX)
            .place_data_file("pelerin.db")
            .map_err(|e| SiteError::XdgDirectory(e.to_string()))
    }

    /// `uploads/` beside the database file, which for the default database
    /// is `$XDG_DATA_HOME/pelerin/uploads`.
    fn default_upload_dir(db_path: &Path) -> PathBuf {
        db_path
            .parent()
            .map_or_else(|| PathBuf::from("uploads"), |parent| parent.join("uploads"))
    }
}
