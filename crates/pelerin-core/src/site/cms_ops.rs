//! CMS entries, read through [`crate::cache::CmsCache`].

use std::collections::HashMap;

use log::{debug, info};

use super::Site;
use crate::{
    error::{Result, SiteError},
    models::{CmsContentType, CmsEntry},
    params::{CmsKey, ListCms, SetCms},
    render,
};

/// Keys are identifiers such as `footer_contact_email`.
fn validate_key(key: &str) -> Result<&str> {
    let key = key.trim();
    if key.is_empty() {
        return Err(SiteError::invalid_input("key").with_reason("key cannot be empty"));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(SiteError::invalid_input("key").with_reason(format!(
            "'{key}' may only contain letters, digits, '_', '-' and '.'"
        )));
    }
    Ok(key)
}

impl Site {
    pub async fn cms_get(&self, params: &CmsKey) -> Result<Option<CmsEntry>> {
        let key = params.key.trim().to_string();
        if let Some(cached) = self.cms_cache.entry(&key).await {
            return Ok(cached);
        }

        let seen = self.cms_cache.generation().await;
        let lookup = key.clone();
        let entry = self.with_db(move |db| db.get_cms(&lookup)).await?;
        self.cms_cache.store_entry(&key, entry.clone(), seen).await;
        Ok(entry)
    }

    /// Like [`Site::cms_get`], but a missing key is an error.
    pub async fn cms_require(&self, params: &CmsKey) -> Result<CmsEntry> {
        self.cms_get(params)
            .await?
            .ok_or_else(|| SiteError::CmsKeyNotFound {
                key: params.key.clone(),
            })
    }

    /// Entries ordered by key, optionally restricted to a prefix.
    pub async fn cms_list(&self, params: &ListCms) -> Result<Vec<CmsEntry>> {
        let prefix = params.prefix.as_deref().filter(|p| !p.is_empty());
        if let Some(cached) = self.cms_cache.list(prefix).await {
            return Ok(cached);
        }

        let seen = self.cms_cache.generation().await;
        let owned = prefix.map(str::to_string);
        let entries = self
            .with_db(move |db| db.list_cms(owned.as_deref()))
            .await?;
        self.cms_cache.store_list(prefix, entries.clone(), seen).await;
        Ok(entries)
    }

    /// Creates or replaces an entry. Returns the entry and the previous value
    /// if there was one.
    pub async fn cms_set(&self, params: &SetCms) -> Result<(CmsEntry, Option<String>)> {
        let key = validate_key(&params.key)?.to_string();
        let content_type = match params.content_type.as_deref() {
            Some(raw) => raw
                .parse::<CmsContentType>()
                .map_err(|e| SiteError::invalid_input("content_type").with_reason(e))?,
            None => CmsContentType::default(),
        };
        let value = params.value.clone();
        let description = params.description.clone();

        let write_key = key.clone();
        let (entry, previous) = self
            .with_db(move |db| {
                let previous = db.get_cms(&write_key)?.map(|e| e.value);
                let entry =
                    db.set_cms(&write_key, content_type, &value, description.as_deref())?;
                Ok((entry, previous))
            })
            .await?;

        self.cms_cache.invalidate(&key).await;
        info!("Set CMS entry '{key}' ({content_type})");
        Ok((entry, previous))
    }

    pub async fn cms_delete(&self, params: &CmsKey) -> Result<CmsEntry> {
        let key = params.key.trim().to_string();
        let lookup = key.clone();
        let entry = self
            .with_db(move |db| db.delete_cms(&lookup))
            .await?
            .ok_or_else(|| SiteError::CmsKeyNotFound { key: key.clone() })?;

        self.cms_cache.invalidate(&key).await;
        info!("Deleted CMS entry '{key}'");
        Ok(entry)
    }

    /// Value of `key`, or `fallback` when the key is not set.
    pub async fn cms_text(&self, key: &str, fallback: &str) -> Result<String> {
        let entry = self
            .cms_get(&CmsKey {
                key: key.to_string(),
            })
            .await?;
        Ok(entry.map_or_else(|| fallback.to_string(), |e| e.value))
    }

    /// Replaces `{{key}}` placeholders with CMS values. Unknown keys stay as
    /// written.
    pub async fn substitute(&self, template: &str) -> Result<String> {
        let values = self.cms_values(render::placeholder_keys(template)).await?;
        Ok(render::substitute(template, |key| {
            values.get(key).map(String::as_str)
        }))
    }

    /// Current entries for `keys`, skipping keys that are not set.
    pub(crate) async fn cms_snapshot<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<CmsEntry>> {
        let mut entries: Vec<CmsEntry> = Vec::new();
        for key in keys {
            if entries.iter().any(|e| e.key == key) {
                continue;
            }
            if let Some(entry) = self
                .cms_get(&CmsKey {
                    key: key.to_string(),
                })
                .await?
            {
                entries.push(entry);
            }
        }
        debug!("CMS snapshot with {} entries", entries.len());
        Ok(entries)
    }

    async fn cms_values<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>> {
        Ok(self
            .cms_snapshot(keys)
            .await?
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect())
    }
}
