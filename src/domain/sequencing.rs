// src/domain/sequencing.rs

//! Ordering of a listing's images.
//!
//! After any mutating operation, position `i` has `display_order == i` and
//! only position 0 is primary. Every operation ends with a full renumbering
//! pass instead of patching neighbours, so a previously inconsistent list is
//! repaired as a side effect.
//!
//! These are in-memory transformations only. Persisting the result is the
//! caller's job, and the new order is not committed until that write succeeds.

use std::str::FromStr;

use crate::domain::listing::ListingImage;
use crate::errors::ServerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(ServerError::BadRequest(format!(
                "invalid direction: {other:?}"
            ))),
        }
    }
}

impl Direction {
    pub fn code(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Stable sort by display order, missing order counting as 0.
pub fn sort_by_display_order(mut images: Vec<ListingImage>) -> Vec<ListingImage> {
    images.sort_by_key(ListingImage::order);
    images
}

/// Renumber the whole list from its positions.
pub fn normalize(images: Vec<ListingImage>) -> Vec<ListingImage> {
    images
        .into_iter()
        .enumerate()
        .map(|(idx, img)| ListingImage {
            display_order: Some(idx as i64),
            is_primary: idx == 0,
            ..img
        })
        .collect()
}

/// Swap the image at `index` with its neighbour. Returns the input unchanged
/// when there is no neighbour in that direction.
pub fn move_adjacent(
    images: Vec<ListingImage>,
    index: usize,
    direction: Direction,
) -> Vec<ListingImage> {
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1),
    };
    let Some(target) = target.filter(|t| *t < images.len() && index < images.len()) else {
        return images;
    };

    let mut images = images;
    images.swap(index, target);
    normalize(images)
}

/// Move the named image to the front. No-op when missing or already first.
pub fn promote_to_first(images: Vec<ListingImage>, image_id: &str) -> Vec<ListingImage> {
    match images.iter().position(|img| img.id == image_id) {
        None | Some(0) => images,
        Some(idx) => {
            let mut images = images;
            let selected = images.remove(idx);
            images.insert(0, selected);
            normalize(images)
        }
    }
}

/// Append freshly uploaded images after the current last position.
///
/// Existing images are left untouched. Only the first image of the first
/// upload for an image-less listing becomes primary.
pub fn append_new(images: Vec<ListingImage>, new_images: Vec<ListingImage>) -> Vec<ListingImage> {
    let start = images.len();
    let was_empty = images.is_empty();

    let mut out = images;
    out.extend(new_images.into_iter().enumerate().map(|(i, img)| ListingImage {
        display_order: Some((start + i) as i64),
        is_primary: was_empty && i == 0,
        ..img
    }));
    out
}

/// Remove the named image and renumber what is left.
/// Returns the removed image so the caller can drop the stored object.
pub fn remove_image(
    images: Vec<ListingImage>,
    image_id: &str,
) -> (Vec<ListingImage>, Option<ListingImage>) {
    let Some(idx) = images.iter().position(|img| img.id == image_id) else {
        return (images, None);
    };
    let mut images = images;
    let removed = images.remove(idx);
    (normalize(images), Some(removed))
}

/// The cover image: the one flagged primary, else the lowest order.
pub fn primary_image(images: &[ListingImage]) -> Option<&ListingImage> {
    images
        .iter()
        .find(|img| img.is_primary)
        .or_else(|| images.iter().min_by_key(|img| img.order()))
}
