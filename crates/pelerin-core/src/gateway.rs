//! Collaborator interfaces the page builder calls out to.
//!
//! [`crate::Site`] implements [`PersistenceGateway`] and [`PilgrimageFeed`]
//! over SQLite; [`crate::upload::DirectoryUploader`] implements
//! [`ImageUploader`]. The editor only depends on these traits.

use std::future::Future;

use crate::{
    error::Result,
    models::{Pilgrimage, PilgrimageFilter, SaveMode},
    sections::PageSectionList,
};

/// A page's section list together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSections {
    pub sections: PageSectionList,
    pub version: u64,
}

/// Whole-document persistence for page section lists.
pub trait PersistenceGateway {
    /// Returns the last saved list verbatim; a page that was never saved
    /// yields an empty list.
    fn load(&self, page_id: u64) -> impl Future<Output = Result<LoadedSections>> + Send;

    /// Replaces the stored list and returns the new version. With
    /// [`SaveMode::Expect`] the save fails with
    /// [`crate::SiteError::VersionConflict`] if someone saved in between.
    fn save(
        &self,
        page_id: u64,
        sections: &PageSectionList,
        mode: SaveMode,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// Read-only pilgrimage listing consumed by feed-driven blocks.
pub trait PilgrimageFeed {
    fn list(&self, filter: &PilgrimageFilter)
        -> impl Future<Output = Result<Vec<Pilgrimage>>> + Send;
}

/// Stores an uploaded image and returns the URL it is served from.
pub trait ImageUploader {
    fn upload(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<String>> + Send;

    /// Removes an upload that never got referenced, given the URL `upload`
    /// returned.
    fn discard(&self, url: &str) -> impl Future<Output = Result<()>> + Send;
}
