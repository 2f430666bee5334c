//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper handles the empty case with a one-line message so callers
//! never have to special-case it.

use std::{fmt, ops::Index};

use crate::models::{CmsEntry, PageSummary, Pilgrimage};

/// Newtype wrapper for displaying page listings.
///
/// ```rust
/// use pelerin_core::{display::PageSummaries, models::PageSummary};
/// use jiff::Timestamp;
///
/// let pages = PageSummaries(vec![PageSummary {
///     id: 1,
///     title: "Acasă".to_string(),
///     slug: "acasa".to_string(),
///     section_count: 4,
///     version: 2,
///     updated_at: Timestamp::now(),
/// }]);
/// assert!(format!("{pages}").contains("Acasă (ID: 1)"));
/// ```
pub struct PageSummaries(pub Vec<PageSummary>);

impl PageSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageSummary> {
        self.0.iter()
    }
}

impl Index<usize> for PageSummaries {
    type Output = PageSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a PageSummaries {
    type Item = &'a PageSummary;
    type IntoIter = std::slice::Iter<'a, PageSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PageSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No pages found.");
        }
        for page in &self.0 {
            write!(f, "{page}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying CMS entries.
pub struct CmsEntries(pub Vec<CmsEntry>);

impl CmsEntries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CmsEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No CMS entries found.");
        }
        for entry in &self.0 {
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying pilgrimage listings.
pub struct Pilgrimages(pub Vec<Pilgrimage>);

impl Pilgrimages {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Pilgrimages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No pilgrimages found.");
        }
        for pilgrimage in &self.0 {
            write!(f, "{pilgrimage}")?;
        }
        Ok(())
    }
}
