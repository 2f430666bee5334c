//! Pilgrimage catalogue operations.

use log::info;

use super::Site;
use crate::{
    db::{pilgrimage_queries::NewPilgrimage, utils::validate_title},
    error::{Result, SiteError},
    gateway::PilgrimageFeed,
    models::Pilgrimage,
    params::{AddPilgrimage, Id, ListPilgrimages},
};

const DEFAULT_CURRENCY: &str = "RON";

fn currency_code(raw: Option<&str>) -> Result<String> {
    let code = raw.map_or(DEFAULT_CURRENCY, str::trim).to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SiteError::invalid_input("currency")
            .with_reason(format!("'{code}' is not a three-letter currency code")));
    }
    Ok(code)
}

impl Site {
    pub async fn add_pilgrimage(&self, params: &AddPilgrimage) -> Result<Pilgrimage> {
        let title = validate_title(&params.title)?.to_string();
        let location = params.location.trim().to_string();
        if location.is_empty() {
            return Err(SiteError::invalid_input("location").with_reason("location cannot be empty"));
        }
        if params.capacity == 0 {
            return Err(SiteError::invalid_input("capacity").with_reason("capacity must be at least 1"));
        }
        let (start_date, end_date) = params.dates()?;
        let currency = currency_code(params.currency.as_deref())?;
        let price = params.price;
        let capacity = params.capacity;
        let featured = params.featured;
        let images = params.images.clone();

        let pilgrimage = self
            .with_db(move |db| {
                db.insert_pilgrimage(&NewPilgrimage {
                    title: &title,
                    location: &location,
                    start_date,
                    end_date,
                    price,
                    currency: &currency,
                    capacity,
                    images: &images,
                    featured,
                })
            })
            .await?;
        info!("Added pilgrimage {} '{}'", pilgrimage.id, pilgrimage.title);
        Ok(pilgrimage)
    }

    /// Lists the catalogue through the same feed the page blocks read.
    pub async fn list_pilgrimages(&self, params: &ListPilgrimages) -> Result<Vec<Pilgrimage>> {
        let filter = params.to_filter()?;
        self.list(&filter).await
    }

    pub async fn get_pilgrimage(&self, params: &Id) -> Result<Pilgrimage> {
        let id = params.id;
        self.with_db(move |db| db.get_pilgrimage(id))
            .await?
            .ok_or(SiteError::PilgrimageNotFound { id })
    }
}
