//! Page document storage.
//!
//! A page's section list is written whole on every save. The `version`
//! column is the concurrency token: [`SaveMode::Expect`] saves only succeed
//! when the stored version still equals the one the caller read.

use jiff::Timestamp;
use log::debug;
use rusqlite::{params, OptionalExtension, Row, Transaction};

use super::utils::{id_at, json_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result, SiteError},
    models::{Page, PageSummary, SaveMode},
    sections::PageSectionList,
};

const PAGE_COLUMNS: &str = "id, title, slug, sections, version, created_at, updated_at";
const INSERT_PAGE_SQL: &str = "INSERT INTO pages (title, slug, sections, version, created_at, updated_at) VALUES (?1, ?2, '[]', 0, ?3, ?3)";
const SLUG_TAKEN_SQL: &str = "SELECT EXISTS(SELECT 1 FROM pages WHERE slug = ?1 AND id != ?2)";
const SELECT_VERSION_SQL: &str = "SELECT version FROM pages WHERE id = ?1";
const SELECT_SECTIONS_SQL: &str = "SELECT sections, version FROM pages WHERE id = ?1";
const UPDATE_SECTIONS_SQL: &str =
    "UPDATE pages SET sections = ?1, version = ?2, updated_at = ?3 WHERE id = ?4";
const UPDATE_META_SQL: &str = "UPDATE pages SET title = ?1, slug = ?2, updated_at = ?3 WHERE id = ?4";
const DELETE_PAGE_SQL: &str = "DELETE FROM pages WHERE id = ?1";
const LIST_PAGES_SQL: &str = "SELECT id, title, slug, json_array_length(sections), version, updated_at FROM pages ORDER BY title COLLATE NOCASE, id";

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<Page> {
    Ok(Page {
        id: id_at(row, 0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        sections: json_at(row, 3)?,
        version: id_at(row, 4)?,
        created_at: timestamp_at(row, 5)?,
        updated_at: timestamp_at(row, 6)?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<PageSummary> {
    Ok(PageSummary {
        id: id_at(row, 0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        section_count: row.get::<_, i64>(3)? as usize,
        version: id_at(row, 4)?,
        updated_at: timestamp_at(row, 5)?,
    })
}

fn ensure_slug_free(tx: &Transaction<'_>, slug: &str, own_id: u64) -> Result<()> {
    let taken: bool = tx
        .query_row(SLUG_TAKEN_SQL, params![slug, own_id as i64], |row| row.get(0))
        .db_context("Failed to check slug")?;
    if taken {
        return Err(SiteError::SlugTaken {
            slug: slug.to_string(),
        });
    }
    Ok(())
}

impl super::Database {
    /// Creates an empty page. The slug must already be validated.
    pub fn create_page(&mut self, title: &str, slug: &str) -> Result<Page> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        ensure_slug_free(&tx, slug, 0)?;

        let now = Timestamp::now();
        tx.execute(INSERT_PAGE_SQL, params![title, slug, now.to_string()])
            .db_context("Failed to insert page")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Page {
            id,
            title: title.to_string(),
            slug: slug.to_string(),
            sections: PageSectionList::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_page(&self, id: u64) -> Result<Option<Page>> {
        self.connection
            .query_row(
                &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?1"),
                params![id as i64],
                page_from_row,
            )
            .optional()
            .db_context("Failed to query page")
    }

    pub fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        self.connection
            .query_row(
                &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE slug = ?1"),
                params![slug],
                page_from_row,
            )
            .optional()
            .db_context("Failed to query page")
    }

    /// Lists pages ordered by title.
    pub fn list_pages(&self) -> Result<Vec<PageSummary>> {
        let mut stmt = self
            .connection
            .prepare(LIST_PAGES_SQL)
            .db_context("Failed to prepare query")?;
        let pages = stmt
            .query_map([], summary_from_row)
            .db_context("Failed to query pages")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read page row")?;
        Ok(pages)
    }

    /// Changes title and slug. Returns `None` for an unknown page.
    pub fn update_page_meta(&mut self, id: u64, title: &str, slug: &str) -> Result<Option<Page>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        ensure_slug_free(&tx, slug, id)?;
        let changed = tx
            .execute(
                UPDATE_META_SQL,
                params![title, slug, Timestamp::now().to_string(), id as i64],
            )
            .db_context("Failed to update page")?;

        tx.commit().db_context("Failed to commit transaction")?;

        if changed == 0 {
            return Ok(None);
        }
        self.get_page(id)
    }

    /// Deletes a page and returns it as it was.
    pub fn delete_page(&mut self, id: u64) -> Result<Option<Page>> {
        let Some(page) = self.get_page(id)? else {
            return Ok(None);
        };
        self.connection
            .execute(DELETE_PAGE_SQL, params![id as i64])
            .db_context("Failed to delete page")?;
        Ok(Some(page))
    }

    /// Reads a page's section list and version. `None` for an unknown page.
    pub fn load_sections(&self, id: u64) -> Result<Option<(PageSectionList, u64)>> {
        self.connection
            .query_row(SELECT_SECTIONS_SQL, params![id as i64], |row| {
                Ok((json_at(row, 0)?, id_at(row, 1)?))
            })
            .optional()
            .db_context("Failed to load page sections")
    }

    /// Replaces a page's section list and returns the new version.
    pub fn save_sections(
        &mut self,
        id: u64,
        sections: &PageSectionList,
        mode: SaveMode,
    ) -> Result<u64> {
        let json = serde_json::to_string(sections)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current: u64 = tx
            .query_row(SELECT_VERSION_SQL, params![id as i64], |row| id_at(row, 0))
            .optional()
            .db_context("Failed to read page version")?
            .ok_or(SiteError::PageNotFound { id })?;

        if let SaveMode::Expect(expected) = mode {
            if expected != current {
                return Err(SiteError::VersionConflict {
                    id,
                    expected,
                    actual: current,
                });
            }
        }

        let next = current + 1;
        tx.execute(
            UPDATE_SECTIONS_SQL,
            params![json, next as i64, Timestamp::now().to_string(), id as i64],
        )
        .db_context("Failed to save page sections")?;

        tx.commit().db_context("Failed to commit transaction")?;

        debug!("Saved {} sections on page {id} (version {next})", sections.len());
        Ok(next)
    }
}
