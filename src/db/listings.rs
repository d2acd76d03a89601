// src/db/listings.rs
use chrono::NaiveDateTime;
use rand::rngs::OsRng;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::images::{images_by_listing, list_images};
use crate::domain::listing::{
    generate_listing_code, Listing, ListingDraft, ListingImage, ListingStatus, NumericOrDisplay,
};
use crate::errors::ServerError;

const LISTING_COLUMNS: &str = r#"
    id, title, description, type, location, status,
    price, price_display, bedrooms, bedrooms_display, bathrooms, bathrooms_display,
    parking, parking_display, area, area_display, is_featured, created_at
"#;

/// Which rows the catalog read returns. Always newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingQuery {
    pub only_available: bool,
    pub featured_only: bool,
    pub limit: Option<usize>,
}

impl ListingQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn available() -> Self {
        Self {
            only_available: true,
            ..Self::default()
        }
    }
}

fn row_to_listing(row: &Row<'_>) -> rusqlite::Result<Listing> {
    // NULL numbers read as 0; the display column, when set, replaces the number.
    let price: Option<f64> = row.get(6)?;
    let area: Option<f64> = row.get(14)?;

    Ok(Listing {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        location: row.get(4)?,
        status: row.get(5)?,
        price: NumericOrDisplay::from_parts(price.unwrap_or(0.0), row.get(7)?),
        bedrooms: NumericOrDisplay::from_parts(row.get(8)?, row.get(9)?),
        bathrooms: NumericOrDisplay::from_parts(row.get(10)?, row.get(11)?),
        parking: NumericOrDisplay::from_parts(row.get(12)?, row.get(13)?),
        area: NumericOrDisplay::from_parts(area.unwrap_or(0.0), row.get(15)?),
        is_featured: row.get(16)?,
        created_at: row.get(17)?,
        images: Vec::new(),
    })
}

/// Listings newest first, each with its images in display order.
pub fn fetch_listings(conn: &Connection, query: &ListingQuery) -> Result<Vec<Listing>, ServerError> {
    let limit: i64 = query
        .limit
        .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
        .unwrap_or(-1);

    let mut stmt = conn.prepare(&format!(
        r#"
        select {LISTING_COLUMNS}
        from properties
        where (?1 = 0 or status = ?2)
          and (?3 = 0 or is_featured = 1)
        order by created_at desc, id asc
        limit ?4
        "#
    ))?;

    let mut listings = stmt
        .query_map(
            params![
                query.only_available,
                ListingStatus::Available,
                query.featured_only,
                limit
            ],
            row_to_listing,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    let ids: Vec<String> = listings.iter().map(|l| l.id.clone()).collect();
    let mut images = images_by_listing(conn, &ids)?;
    for listing in &mut listings {
        listing.images = images.remove(&listing.id).unwrap_or_default();
    }

    Ok(listings)
}

pub fn get_listing(conn: &Connection, id: &str) -> Result<Option<Listing>, ServerError> {
    let listing = conn
        .query_row(
            &format!("select {LISTING_COLUMNS} from properties where id = ?"),
            params![id],
            row_to_listing,
        )
        .optional()?;

    match listing {
        Some(mut listing) => {
            listing.images = list_images(conn, &listing.id)?;
            Ok(Some(listing))
        }
        None => Ok(None),
    }
}

/// The stored row as edit-form values. Numbers behind a display override are
/// kept, so saving the form untouched writes back what was read.
pub fn get_listing_draft(conn: &Connection, id: &str) -> Result<Option<ListingDraft>, ServerError> {
    let draft = conn
        .query_row(
            r#"
            select title, description, type, location, status,
                   price, price_display, bedrooms, bedrooms_display,
                   bathrooms, bathrooms_display, parking, parking_display,
                   area, area_display, is_featured
            from properties
            where id = ?
            "#,
            params![id],
            |row| {
                let price: Option<f64> = row.get(5)?;
                let area: Option<f64> = row.get(13)?;
                Ok(ListingDraft {
                    title: row.get(0)?,
                    description: row.get(1)?,
                    category: row.get(2)?,
                    location: row.get(3)?,
                    status: row.get(4)?,
                    price: price.unwrap_or(0.0),
                    price_display: row.get(6)?,
                    bedrooms: row.get(7)?,
                    bedrooms_display: row.get(8)?,
                    bathrooms: row.get(9)?,
                    bathrooms_display: row.get(10)?,
                    parking: row.get(11)?,
                    parking_display: row.get(12)?,
                    area: area.unwrap_or(0.0),
                    area_display: row.get(14)?,
                    is_featured: row.get(15)?,
                })
            },
        )
        .optional()?;
    Ok(draft)
}

fn listing_exists(conn: &Connection, id: &str) -> Result<bool, ServerError> {
    let found: Option<i64> = conn
        .query_row("select 1 from properties where id = ?", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

/// Insert a new listing and return its reference code.
pub fn insert_listing(
    conn: &Connection,
    draft: &ListingDraft,
    now: NaiveDateTime,
) -> Result<String, ServerError> {
    let mut id = generate_listing_code(&mut OsRng);
    let mut attempts = 1;
    while listing_exists(conn, &id)? {
        if attempts >= 5 {
            return Err(ServerError::DbError("could not allocate listing code".into()));
        }
        id = generate_listing_code(&mut OsRng);
        attempts += 1;
    }

    conn.execute(
        r#"
        insert into properties (
            id, title, description, type, location, status,
            price, price_display, bedrooms, bedrooms_display, bathrooms, bathrooms_display,
            parking, parking_display, area, area_display, is_featured, created_at
        ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        "#,
        params![
            id,
            draft.title,
            draft.description,
            draft.category,
            draft.location,
            draft.status,
            draft.price,
            draft.price_display,
            draft.bedrooms,
            draft.bedrooms_display,
            draft.bathrooms,
            draft.bathrooms_display,
            draft.parking,
            draft.parking_display,
            draft.area,
            draft.area_display,
            draft.is_featured,
            now,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert listing failed: {e}")))?;

    Ok(id)
}

pub fn update_listing(conn: &Connection, id: &str, draft: &ListingDraft) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            r#"
            update properties set
                title = ?1, description = ?2, type = ?3, location = ?4, status = ?5,
                price = ?6, price_display = ?7, bedrooms = ?8, bedrooms_display = ?9,
                bathrooms = ?10, bathrooms_display = ?11, parking = ?12, parking_display = ?13,
                area = ?14, area_display = ?15, is_featured = ?16
            where id = ?17
            "#,
            params![
                draft.title,
                draft.description,
                draft.category,
                draft.location,
                draft.status,
                draft.price,
                draft.price_display,
                draft.bedrooms,
                draft.bedrooms_display,
                draft.bathrooms,
                draft.bathrooms_display,
                draft.parking,
                draft.parking_display,
                draft.area,
                draft.area_display,
                draft.is_featured,
                id,
            ],
        )
        .map_err(|e| ServerError::DbError(format!("update listing failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

/// Delete a listing. Its image rows cascade; they are returned so the caller
/// can remove the stored files.
pub fn delete_listing(conn: &Connection, id: &str) -> Result<Vec<ListingImage>, ServerError> {
    let images = list_images(conn, id)?;
    let deleted = conn
        .execute("delete from properties where id = ?", params![id])
        .map_err(|e| ServerError::DbError(format!("delete listing failed: {e}")))?;

    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(images)
}
