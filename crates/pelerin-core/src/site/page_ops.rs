//! Page metadata operations.

use log::{debug, info};

use super::Site;
use crate::{
    db::utils::{resolve_slug, validate_title},
    error::{Result, SiteError},
    models::{Page, PageSummary},
    params::{CreatePage, Id, RenamePage},
};

impl Site {
    /// Creates an empty page. Without an explicit slug one is derived from
    /// the title.
    pub async fn create_page(&self, params: &CreatePage) -> Result<Page> {
        let title = validate_title(&params.title)?.to_string();
        let slug = resolve_slug(&title, params.slug.as_deref())?;

        let page = self
            .with_db(move |db| db.create_page(&title, &slug))
            .await?;
        info!("Created page {} '{}' at /{}", page.id, page.title, page.slug);
        Ok(page)
    }

    /// Retrieves a page with its sections.
    pub async fn get_page(&self, params: &Id) -> Result<Option<Page>> {
        let id = params.id;
        self.with_db(move |db| db.get_page(id)).await
    }

    /// Like [`Site::get_page`], but a missing page is an error.
    pub async fn require_page(&self, params: &Id) -> Result<Page> {
        self.get_page(params)
            .await?
            .ok_or(SiteError::PageNotFound { id: params.id })
    }

    pub async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        let slug = slug.trim().trim_matches('/').to_string();
        self.with_db(move |db| db.get_page_by_slug(&slug)).await
    }

    /// All pages ordered by title, without section payloads.
    pub async fn list_pages(&self) -> Result<Vec<PageSummary>> {
        self.with_db(|db| db.list_pages()).await
    }

    /// Changes the title and/or slug of a page. Returns the updated page and
    /// a description of each change.
    pub async fn rename_page(&self, params: &RenamePage) -> Result<(Page, Vec<String>)> {
        let current = self.require_page(&Id { id: params.id }).await?;

        let mut changes = Vec::new();
        let title = match params.title.as_deref() {
            Some(title) => {
                let title = validate_title(title)?.to_string();
                if title != current.title {
                    changes.push(format!("title: '{}' → '{title}'", current.title));
                }
                title
            }
            None => current.title.clone(),
        };
        let slug = match params.slug.as_deref() {
            Some(slug) => {
                let slug = resolve_slug(&title, Some(slug))?;
                if slug != current.slug {
                    changes.push(format!("slug: /{} → /{slug}", current.slug));
                }
                slug
            }
            None => current.slug.clone(),
        };

        if changes.is_empty() {
            debug!("Rename of page {} changed nothing", current.id);
            return Ok((current, changes));
        }

        let id = params.id;
        let page = self
            .with_db(move |db| db.update_page_meta(id, &title, &slug))
            .await?
            .ok_or(SiteError::PageNotFound { id })?;
        Ok((page, changes))
    }

    /// Deletes a page and returns it as it was.
    pub async fn delete_page(&self, params: &Id) -> Result<Page> {
        let id = params.id;
        let page = self
            .with_db(move |db| db.delete_page(id))
            .await?
            .ok_or(SiteError::PageNotFound { id })?;
        info!("Deleted page {id} '{}'", page.title);
        Ok(page)
    }
}
