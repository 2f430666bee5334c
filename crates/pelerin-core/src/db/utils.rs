//! Column conversions and input validation shared by the query modules.

use std::str::FromStr;

use jiff::Timestamp;
use rusqlite::{types::Type, Row};
use serde::de::DeserializeOwned;

use crate::{
    error::{Result, SiteError},
    models::text::fold_char,
};

/// Longest accepted slug, in bytes.
pub const MAX_SLUG_LEN: usize = 96;

fn conversion_error(
    index: usize,
    error: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
}

/// Reads an RFC 3339 timestamp column.
pub(crate) fn timestamp_at(row: &Row<'_>, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| conversion_error(index, e))
}

/// Reads a text column through `FromStr`.
pub(crate) fn parsed_at<T>(row: &Row<'_>, index: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    row.get::<_, String>(index)?.parse::<T>().map_err(|e| {
        conversion_error(
            index,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
        )
    })
}

/// Reads a JSON text column.
pub(crate) fn json_at<T: DeserializeOwned>(row: &Row<'_>, index: usize) -> rusqlite::Result<T> {
    let raw = row.get::<_, String>(index)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(index, e))
}

/// Reads a non-negative integer column as `u64`.
pub(crate) fn id_at(row: &Row<'_>, index: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(index)? as u64)
}

/// Derives a URL slug from a title: lowercase ASCII letters and digits
/// separated by single dashes. Romanian diacritics fold to their base letter.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars().flat_map(char::to_lowercase) {
        let folded = fold_char(ch);
        if folded.is_ascii_alphanumeric() {
            slug.push(folded);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Validates an explicit slug or derives one from the title.
pub fn resolve_slug(title: &str, slug: Option<&str>) -> Result<String> {
    let slug = match slug {
        Some(explicit) => explicit.trim().trim_matches('/').to_string(),
        None => slugify(title),
    };
    if slug.is_empty() {
        return Err(SiteError::invalid_input("slug").with_reason("slug cannot be empty"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(SiteError::invalid_input("slug")
            .with_reason(format!("slug is longer than {MAX_SLUG_LEN} characters")));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(SiteError::invalid_input("slug").with_reason(format!(
            "'{slug}' may only contain lowercase letters, digits and dashes"
        )));
    }
    Ok(slug)
}

/// Rejects blank titles and returns the trimmed title.
pub fn validate_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(SiteError::invalid_input("title").with_reason("title cannot be empty"));
    }
    Ok(title)
}
