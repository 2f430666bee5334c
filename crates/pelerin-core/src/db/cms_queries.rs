//! CMS key/value storage.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension, Row};

use super::utils::{parsed_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{CmsContentType, CmsEntry},
};

const CMS_COLUMNS: &str = "key, content_type, value, description, updated_at";
const UPSERT_CMS_SQL: &str = "INSERT INTO cms_content (key, content_type, value, description, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT(key) DO UPDATE SET content_type = excluded.content_type, value = excluded.value, \
     description = COALESCE(excluded.description, cms_content.description), updated_at = excluded.updated_at";
const DELETE_CMS_SQL: &str = "DELETE FROM cms_content WHERE key = ?1";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<CmsEntry> {
    Ok(CmsEntry {
        key: row.get(0)?,
        content_type: parsed_at(row, 1)?,
        value: row.get(2)?,
        description: row.get(3)?,
        updated_at: timestamp_at(row, 4)?,
    })
}

impl super::Database {
    pub fn get_cms(&self, key: &str) -> Result<Option<CmsEntry>> {
        self.connection
            .query_row(
                &format!("SELECT {CMS_COLUMNS} FROM cms_content WHERE key = ?1"),
                params![key],
                entry_from_row,
            )
            .optional()
            .db_context("Failed to query CMS entry")
    }

    /// Lists entries ordered by key, optionally restricted to a key prefix.
    pub fn list_cms(&self, prefix: Option<&str>) -> Result<Vec<CmsEntry>> {
        let mut query = format!("SELECT {CMS_COLUMNS} FROM cms_content");
        let mut values: Vec<String> = Vec::new();
        if let Some(prefix) = prefix {
            // substr comparison avoids LIKE wildcards inside keys
            query.push_str(" WHERE substr(key, 1, length(?1)) = ?1");
            values.push(prefix.to_string());
        }
        query.push_str(" ORDER BY key");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let entries = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), entry_from_row)
            .db_context("Failed to query CMS entries")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read CMS row")?;
        Ok(entries)
    }

    /// Inserts or replaces an entry. A missing description keeps the stored
    /// one.
    pub fn set_cms(
        &mut self,
        key: &str,
        content_type: CmsContentType,
        value: &str,
        description: Option<&str>,
    ) -> Result<CmsEntry> {
        let now = Timestamp::now();
        self.connection
            .execute(
                UPSERT_CMS_SQL,
                params![key, content_type.as_str(), value, description, now.to_string()],
            )
            .db_context("Failed to write CMS entry")?;

        self.get_cms(key)?.ok_or_else(|| crate::error::SiteError::CmsKeyNotFound {
            key: key.to_string(),
        })
    }

    pub fn delete_cms(&mut self, key: &str) -> Result<Option<CmsEntry>> {
        let Some(entry) = self.get_cms(key)? else {
            return Ok(None);
        };
        self.connection
            .execute(DELETE_CMS_SQL, params![key])
            .db_context("Failed to delete CMS entry")?;
        Ok(Some(entry))
    }
}
