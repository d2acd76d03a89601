pub mod currency;
pub mod filter;
pub mod listing;
pub mod sequencing;

pub use listing::{Category, Listing, ListingImage, ListingStatus, NumericOrDisplay};
