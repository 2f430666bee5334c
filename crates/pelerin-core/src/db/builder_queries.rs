//! Builder page storage. Same document-plus-version scheme as `pages`.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::utils::{id_at, json_at, timestamp_at};
use crate::{
    builder::{self, BuilderPage},
    error::{DatabaseResultExt, Result, SiteError},
    models::{PageSummary, SaveMode},
};

const BUILDER_COLUMNS: &str = "id, title, slug, sections, version, created_at, updated_at";
const INSERT_BUILDER_SQL: &str = "INSERT INTO builder_pages (title, slug, sections, version, created_at, updated_at) VALUES (?1, ?2, '[]', 0, ?3, ?3)";
const SLUG_TAKEN_SQL: &str = "SELECT EXISTS(SELECT 1 FROM builder_pages WHERE slug = ?1)";
const SELECT_VERSION_SQL: &str = "SELECT version FROM builder_pages WHERE id = ?1";
const UPDATE_BUILDER_SQL: &str =
    "UPDATE builder_pages SET title = ?1, sections = ?2, version = ?3, updated_at = ?4 WHERE id = ?5";
const DELETE_BUILDER_SQL: &str = "DELETE FROM builder_pages WHERE id = ?1";
const LIST_BUILDER_SQL: &str = "SELECT id, title, slug, json_array_length(sections), version, updated_at FROM builder_pages ORDER BY title COLLATE NOCASE, id";

fn builder_from_row(row: &Row<'_>) -> rusqlite::Result<BuilderPage> {
    Ok(BuilderPage {
        id: id_at(row, 0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        sections: builder::with_unique_ids(json_at(row, 3)?),
        version: id_at(row, 4)?,
        created_at: timestamp_at(row, 5)?,
        updated_at: timestamp_at(row, 6)?,
    })
}

impl super::Database {
    pub fn create_builder_page(&mut self, title: &str, slug: &str) -> Result<BuilderPage> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let taken: bool = tx
            .query_row(SLUG_TAKEN_SQL, params![slug], |row| row.get(0))
            .db_context("Failed to check slug")?;
        if taken {
            return Err(SiteError::SlugTaken {
                slug: slug.to_string(),
            });
        }

        let now = Timestamp::now();
        tx.execute(INSERT_BUILDER_SQL, params![title, slug, now.to_string()])
            .db_context("Failed to insert builder page")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(BuilderPage {
            id,
            title: title.to_string(),
            slug: slug.to_string(),
            sections: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn get_builder_page(&self, id: u64) -> Result<Option<BuilderPage>> {
        self.connection
            .query_row(
                &format!("SELECT {BUILDER_COLUMNS} FROM builder_pages WHERE id = ?1"),
                params![id as i64],
                builder_from_row,
            )
            .optional()
            .db_context("Failed to query builder page")
    }

    pub fn list_builder_pages(&self) -> Result<Vec<PageSummary>> {
        let mut stmt = self
            .connection
            .prepare(LIST_BUILDER_SQL)
            .db_context("Failed to prepare query")?;
        let pages = stmt
            .query_map([], |row| {
                Ok(PageSummary {
                    id: id_at(row, 0)?,
                    title: row.get(1)?,
                    slug: row.get(2)?,
                    section_count: row.get::<_, i64>(3)? as usize,
                    version: id_at(row, 4)?,
                    updated_at: timestamp_at(row, 5)?,
                })
            })
            .db_context("Failed to query builder pages")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read builder page row")?;
        Ok(pages)
    }

    /// Writes title and sections of `page` and returns the new version.
    pub fn save_builder_page(&mut self, page: &BuilderPage, mode: SaveMode) -> Result<u64> {
        let json = serde_json::to_string(&page.sections)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current: u64 = tx
            .query_row(SELECT_VERSION_SQL, params![page.id as i64], |row| id_at(row, 0))
            .optional()
            .db_context("Failed to read builder page version")?
            .ok_or(SiteError::BuilderPageNotFound { id: page.id })?;

        if let SaveMode::Expect(expected) = mode {
            if expected != current {
                return Err(SiteError::VersionConflict {
                    id: page.id,
                    expected,
                    actual: current,
                });
            }
        }

        let next = current + 1;
        tx.execute(
            UPDATE_BUILDER_SQL,
            params![
                page.title,
                json,
                next as i64,
                Timestamp::now().to_string(),
                page.id as i64
            ],
        )
        .db_context("Failed to save builder page")?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(next)
    }

    pub fn delete_builder_page(&mut self, id: u64) -> Result<Option<BuilderPage>> {
        let Some(page) = self.get_builder_page(id)? else {
            return Ok(None);
        };
        self.connection
            .execute(DELETE_BUILDER_SQL, params![id as i64])
            .db_context("Failed to delete builder page")?;
        Ok(Some(page))
    }
}
