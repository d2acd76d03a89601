// src/db/images.rs
use chrono::NaiveDateTime;
use rand::rngs::OsRng;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};
use std::collections::HashMap;

use crate::auth::token::generate_token;
use crate::domain::listing::ListingImage;
use crate::domain::sequencing::sort_by_display_order;
use crate::errors::ServerError;

const IMAGE_COLUMNS: &str = "id, property_id, image_url, storage_key, is_primary, display_order";

fn row_to_image(row: &Row<'_>) -> rusqlite::Result<ListingImage> {
    Ok(ListingImage {
        id: row.get(0)?,
        listing_id: row.get(1)?,
        url: row.get(2)?,
        storage_key: row.get(3)?,
        is_primary: row.get(4)?,
        display_order: row.get(5)?,
    })
}

/// A not-yet-positioned image; `append_new` assigns its order.
pub fn new_image(listing_id: &str, url: &str, storage_key: Option<String>) -> ListingImage {
    ListingImage {
        id: generate_token(&mut OsRng, 12),
        listing_id: listing_id.to_string(),
        url: url.to_string(),
        storage_key,
        is_primary: false,
        display_order: None,
    }
}

/// Images of one listing, in display order.
pub fn list_images(conn: &Connection, listing_id: &str) -> Result<Vec<ListingImage>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        "select {IMAGE_COLUMNS} from property_images where property_id = ? order by rowid"
    ))?;
    let images = stmt
        .query_map(params![listing_id], row_to_image)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sort_by_display_order(images))
}

/// Images of the given listings, grouped by listing id, each group in
/// display order. Listings without images have no entry.
pub fn images_by_listing(
    conn: &Connection,
    listing_ids: &[String],
) -> Result<HashMap<String, Vec<ListingImage>>, ServerError> {
    let mut grouped: HashMap<String, Vec<ListingImage>> = HashMap::new();

    // Stay well under SQLite's bound-parameter limit.
    for ids in listing_ids.chunks(500) {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
            "select {IMAGE_COLUMNS} from property_images \
             where property_id in ({placeholders}) order by rowid"
        ))?;
        let rows = stmt.query_map(params_from_iter(ids), row_to_image)?;
        for image in rows {
            let image = image?;
            grouped.entry(image.listing_id.clone()).or_default().push(image);
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(id, images)| (id, sort_by_display_order(images)))
        .collect())
}

pub fn insert_images(
    conn: &mut Connection,
    images: &[ListingImage],
    now: NaiveDateTime,
) -> Result<(), ServerError> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            r#"
            insert into property_images
                (id, property_id, image_url, storage_key, is_primary, display_order, created_at)
            values (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;
        for img in images {
            stmt.execute(params![
                img.id,
                img.listing_id,
                img.url,
                img.storage_key,
                img.is_primary,
                img.display_order,
                now,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn write_order(tx: &Transaction<'_>, images: &[ListingImage]) -> Result<(), ServerError> {
    let mut stmt = tx.prepare(
        "update property_images set display_order = ?1, is_primary = ?2 where id = ?3 and property_id = ?4",
    )?;
    for img in images {
        let updated = stmt.execute(params![
            img.display_order,
            img.is_primary,
            img.id,
            img.listing_id
        ])?;
        if updated != 1 {
            return Err(ServerError::DbError(format!(
                "image {} no longer exists",
                img.id
            )));
        }
    }
    Ok(())
}

/// Persist a reordering: one UPDATE per image setting `display_order` and
/// `is_primary`. All rows commit together or none do, so a failed write
/// leaves the previously stored order in place.
pub fn update_image_order(
    conn: &mut Connection,
    images: &[ListingImage],
) -> Result<(), ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;
    write_order(&tx, images)?;
    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
    Ok(())
}

/// Returns whether a row was deleted.
pub fn delete_image(
    conn: &Connection,
    listing_id: &str,
    image_id: &str,
) -> Result<bool, ServerError> {
    let deleted = conn.execute(
        "delete from property_images where id = ? and property_id = ?",
        params![image_id, listing_id],
    )?;
    Ok(deleted == 1)
}

/// Delete one image and store the renumbered remainder in the same
/// transaction. Returns false (and changes nothing) when the image is gone.
pub fn delete_image_and_reorder(
    conn: &mut Connection,
    listing_id: &str,
    image_id: &str,
    remaining: &[ListingImage],
) -> Result<bool, ServerError> {
    let tx = conn.transaction()?;
    let deleted = tx.execute(
        "delete from property_images where id = ? and property_id = ?",
        params![image_id, listing_id],
    )?;
    if deleted != 1 {
        return Ok(false);
    }
    write_order(&tx, remaining)?;
    tx.commit()?;
    Ok(true)
}
