//! Async service layer over the SQLite store.
//!
//! [`Site`] is what the CLI and the MCP server talk to. Every method opens
//! the database on a blocking thread, runs one query-module call and hands
//! the result back, so callers never block the runtime.
//!
//! ```text
//! CLI / MCP ──▶ Site (async) ──▶ spawn_blocking ──▶ Database (rusqlite)
//!                 │
//!                 ├── PageSectionList ops (load → mutate → save)
//!                 ├── CmsCache (per-key invalidation)
//!                 └── render::html (view mode)
//! ```
//!
//! Submodules group methods by resource:
//!
//! - [`builder`]: [`SiteBuilder`], database and upload locations
//! - [`page_ops`]: page metadata
//! - [`section_ops`]: section commands on a page's list
//! - [`cms_ops`]: CMS entries and placeholder substitution
//! - [`pilgrimage_ops`]: pilgrimage catalogue
//! - [`builder_ops`]: builder-tool pages
//! - [`render_ops`]: view-mode HTML
//!
//! ```rust,no_run
//! use pelerin_core::{params::CreatePage, SiteBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let site = SiteBuilder::new()
//!     .with_database_path(Some("/tmp/pelerin.db"))
//!     .build()
//!     .await?;
//! let page = site
//!     .create_page(&CreatePage {
//!         title: "Acasă".to_string(),
//!         slug: None,
//!     })
//!     .await?;
//! assert_eq!(page.slug, "acasa");
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::task;

use crate::{
    cache::CmsCache,
    db::Database,
    error::{Result, SiteError},
    gateway::{LoadedSections, PersistenceGateway, PilgrimageFeed},
    models::{Pilgrimage, PilgrimageFilter, SaveMode},
    sections::PageSectionList,
    upload::DirectoryUploader,
};

pub mod builder;
pub mod builder_ops;
pub mod cms_ops;
pub mod page_ops;
pub mod pilgrimage_ops;
pub mod render_ops;
pub mod section_ops;

#[cfg(test)]
mod tests;

pub use builder::SiteBuilder;
pub use section_ops::Edited;

/// Entry point for every page, CMS and catalogue operation.
pub struct Site {
    pub(crate) db_path: PathBuf,
    pub(crate) upload_dir: PathBuf,
    pub(crate) cms_cache: CmsCache,
}

impl Site {
    pub(crate) fn new(db_path: PathBuf, upload_dir: PathBuf) -> Self {
        Self {
            db_path,
            upload_dir,
            cms_cache: CmsCache::new(),
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Uploader writing into this site's upload directory.
    pub fn uploader(&self) -> DirectoryUploader {
        DirectoryUploader::new(&self.upload_dir)
    }

    /// Runs `f` against a freshly opened database on the blocking pool.
    pub(crate) async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(SiteError::join)?
    }
}

impl PersistenceGateway for Site {
    async fn load(&self, page_id: u64) -> Result<LoadedSections> {
        let (sections, version) = self
            .with_db(move |db| db.load_sections(page_id))
            .await?
            .ok_or(SiteError::PageNotFound { id: page_id })?;
        Ok(LoadedSections { sections, version })
    }

    async fn save(&self, page_id: u64, sections: &PageSectionList, mode: SaveMode) -> Result<u64> {
        let sections = sections.clone();
        self.with_db(move |db| db.save_sections(page_id, &sections, mode))
            .await
    }
}

impl PilgrimageFeed for Site {
    async fn list(&self, filter: &PilgrimageFilter) -> Result<Vec<Pilgrimage>> {
        let filter = filter.clone();
        self.with_db(move |db| db.list_pilgrimages(&filter)).await
    }
}
