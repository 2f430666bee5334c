//! Pilgrimage catalogue storage.

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, OptionalExtension, Row};

use super::utils::{id_at, json_at, parsed_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Pilgrimage, PilgrimageFilter},
};

const PILGRIMAGE_COLUMNS: &str = "id, title, location, start_date, end_date, price, currency, capacity, booked, images, featured, created_at";
const INSERT_PILGRIMAGE_SQL: &str = "INSERT INTO pilgrimages (title, location, start_date, end_date, price, currency, capacity, booked, images, featured, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9, ?10)";

fn pilgrimage_from_row(row: &Row<'_>) -> rusqlite::Result<Pilgrimage> {
    Ok(Pilgrimage {
        id: id_at(row, 0)?,
        title: row.get(1)?,
        location: row.get(2)?,
        start_date: parsed_at(row, 3)?,
        end_date: parsed_at(row, 4)?,
        price: row.get(5)?,
        currency: row.get(6)?,
        capacity: row.get(7)?,
        booked: row.get(8)?,
        images: json_at(row, 9)?,
        featured: row.get(10)?,
        created_at: timestamp_at(row, 11)?,
    })
}

/// Column values of a pilgrimage about to be inserted.
pub struct NewPilgrimage<'a> {
    pub title: &'a str,
    pub location: &'a str,
    pub start_date: Date,
    pub end_date: Date,
    pub price: u32,
    pub currency: &'a str,
    pub capacity: u32,
    pub images: &'a [String],
    pub featured: bool,
}

impl super::Database {
    pub fn insert_pilgrimage(&mut self, new: &NewPilgrimage<'_>) -> Result<Pilgrimage> {
        let now = Timestamp::now();
        let images = serde_json::to_string(new.images)?;
        self.connection
            .execute(
                INSERT_PILGRIMAGE_SQL,
                params![
                    new.title,
                    new.location,
                    new.start_date.to_string(),
                    new.end_date.to_string(),
                    new.price,
                    new.currency,
                    new.capacity,
                    images,
                    new.featured,
                    now.to_string()
                ],
            )
            .db_context("Failed to insert pilgrimage")?;

        Ok(Pilgrimage {
            id: self.connection.last_insert_rowid() as u64,
            title: new.title.to_string(),
            location: new.location.to_string(),
            start_date: new.start_date,
            end_date: new.end_date,
            price: new.price,
            currency: new.currency.to_string(),
            capacity: new.capacity,
            booked: 0,
            images: new.images.to_vec(),
            featured: new.featured,
            created_at: now,
        })
    }

    pub fn get_pilgrimage(&self, id: u64) -> Result<Option<Pilgrimage>> {
        self.connection
            .query_row(
                &format!("SELECT {PILGRIMAGE_COLUMNS} FROM pilgrimages WHERE id = ?1"),
                params![id as i64],
                pilgrimage_from_row,
            )
            .optional()
            .db_context("Failed to query pilgrimage")
    }

    /// Lists pilgrimages matching `filter`, soonest first.
    ///
    /// Price, date, featured and availability filters run in SQL. Location
    /// matching runs on the decoded rows so it is case-insensitive for
    /// diacritics too.
    pub fn list_pilgrimages(&self, filter: &PilgrimageFilter) -> Result<Vec<Pilgrimage>> {
        let mut query = format!("SELECT {PILGRIMAGE_COLUMNS} FROM pilgrimages");
        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(max) = filter.max_price {
            conditions.push("price <= ?");
            params_vec.push(Box::new(max));
        }
        if let Some(after) = filter.starts_after {
            conditions.push("start_date >= ?");
            params_vec.push(Box::new(after.to_string()));
        }
        if filter.featured_only {
            conditions.push("featured = 1");
        }
        if filter.available_only {
            conditions.push("booked < capacity");
        }
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY start_date, id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();
        let rows = stmt
            .query_map(&params_refs[..], pilgrimage_from_row)
            .db_context("Failed to query pilgrimages")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read pilgrimage row")?;

        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(rows
            .into_iter()
            .filter(|p| filter.matches(p))
            .take(limit)
            .collect())
    }
}
