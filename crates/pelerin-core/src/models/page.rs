//! Page document model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::sections::PageSectionList;

/// A page document: metadata plus its ordered section list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    /// Unique identifier for the page
    pub id: u64,

    /// Title shown in navigation and the browser tab
    pub title: String,

    /// URL slug, unique across pages
    pub slug: String,

    /// Ordered content blocks
    #[serde(default)]
    pub sections: PageSectionList,

    /// Optimistic concurrency token, bumped on every save
    pub version: u64,

    /// Timestamp when the page was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the page was last saved (UTC)
    pub updated_at: Timestamp,
}

/// Page listing entry without the section payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageSummary {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub section_count: usize,
    pub version: u64,
    pub updated_at: Timestamp,
}

impl From<&Page> for PageSummary {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id,
            title: page.title.clone(),
            slug: page.slug.clone(),
            section_count: page.sections.len(),
            version: page.version,
            updated_at: page.updated_at,
        }
    }
}

/// How a save treats a version mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Reject the save unless the stored version equals the given one.
    Expect(u64),
    /// Last write wins.
    Overwrite,
}
