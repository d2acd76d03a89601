// src/domain/filter.rs

//! Catalog filtering: which listings satisfy a set of criteria, and the
//! dynamic bounds used to initialise the range controls.
//!
//! Every function here is pure. The same listings and criteria always give
//! the same answer, and input order is preserved.

use std::collections::{BTreeSet, HashMap};

use crate::domain::listing::{Category, Listing, ListingStatus};

pub const FALLBACK_PRICE: NumRange = NumRange {
    min: 0.0,
    max: 50_000_000.0,
};
pub const FALLBACK_AREA: NumRange = NumRange {
    min: 0.0,
    max: 1000.0,
};

/// Inclusive range on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumRange {
    pub min: f64,
    pub max: f64,
}

impl NumRange {
    /// No constraint: every non-negative value is inside.
    pub const OPEN: NumRange = NumRange {
        min: 0.0,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `min > max` contains nothing; that is not an error.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_open(&self) -> bool {
        *self == Self::OPEN
    }
}

/// Bedroom/parking filter value: any, exactly N, or N or more ("N+").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bucket {
    #[default]
    Any,
    Exact(u32),
    AtLeast(u32),
}

impl Bucket {
    /// Options offered by the catalog form.
    pub const CHOICES: [Bucket; 5] = [
        Bucket::Any,
        Bucket::Exact(1),
        Bucket::Exact(2),
        Bucket::Exact(3),
        Bucket::AtLeast(4),
    ];

    /// Unrecognised text means "no constraint".
    pub fn parse(raw: &str) -> Bucket {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return Bucket::Any;
        }
        if let Some(n) = raw.strip_suffix('+') {
            return n.trim().parse().map(Bucket::AtLeast).unwrap_or(Bucket::Any);
        }
        raw.parse().map(Bucket::Exact).unwrap_or(Bucket::Any)
    }

    pub fn matches(self, n: u32) -> bool {
        match self {
            Bucket::Any => true,
            Bucket::Exact(want) => n == want,
            Bucket::AtLeast(min) => n >= min,
        }
    }

    pub fn code(self) -> String {
        match self {
            Bucket::Any => String::new(),
            Bucket::Exact(n) => n.to_string(),
            Bucket::AtLeast(n) => format!("{n}+"),
        }
    }

    pub fn label(self) -> String {
        match self {
            Bucket::Any => "Todos".to_string(),
            Bucket::Exact(n) => n.to_string(),
            Bucket::AtLeast(n) => format!("{n}+"),
        }
    }
}

/// Dynamic bounds for the range controls plus the location choices.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogBounds {
    pub price: NumRange,
    pub area: NumRange,
    /// Distinct, non-empty, case-sensitive, sorted.
    pub locations: BTreeSet<String>,
}

impl CatalogBounds {
    pub fn fallback() -> Self {
        Self {
            price: FALLBACK_PRICE,
            area: FALLBACK_AREA,
            locations: BTreeSet::new(),
        }
    }
}

/// Min/max over positive values only; falls back when there are none.
fn positive_range(values: impl Iterator<Item = f64>, fallback: NumRange) -> NumRange {
    let (lo, hi) = values
        .filter(|v| *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return fallback;
    }
    NumRange::new(lo.max(fallback.min), hi)
}

/// Bounds used to initialise the range controls.
///
/// Overridden prices/areas contribute nothing. Zero values are left out of
/// the computed range.
pub fn bounds(listings: &[Listing]) -> CatalogBounds {
    if listings.is_empty() {
        return CatalogBounds::fallback();
    }

    let price = positive_range(listings.iter().filter_map(|l| l.price.exact()), FALLBACK_PRICE);
    let area = positive_range(listings.iter().filter_map(|l| l.area.exact()), FALLBACK_AREA);
    let locations = listings
        .iter()
        .map(|l| l.location.clone())
        .filter(|loc| !loc.trim().is_empty())
        .collect();

    CatalogBounds {
        price,
        area,
        locations,
    }
}

/// User-chosen filters. `None`/`Any`/`NumRange::OPEN` mean "no constraint".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub location: Option<String>,
    pub category: Option<Category>,
    pub status: Option<ListingStatus>,
    pub bedrooms: Bucket,
    pub parking: Bucket,
    pub price_range: NumRange,
    pub area_range: NumRange,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::unconstrained()
    }
}

impl FilterCriteria {
    pub fn unconstrained() -> Self {
        Self {
            search_term: String::new(),
            location: None,
            category: None,
            status: None,
            bedrooms: Bucket::Any,
            parking: Bucket::Any,
            price_range: NumRange::OPEN,
            area_range: NumRange::OPEN,
        }
    }

    pub fn has_active_filters(&self) -> bool {
        *self != Self::unconstrained()
    }

    /// Parse the catalog query string.
    ///
    /// Range endpoints are clamped into `bounds` and swapped when reversed.
    /// An endpoint sitting on the edge of the bounds (or missing) leaves that
    /// side open, so a slider at its end never hides listings.
    pub fn from_query(params: &HashMap<String, String>, bounds: &CatalogBounds) -> Self {
        let get = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        };

        FilterCriteria {
            search_term: get("q").unwrap_or_default().to_string(),
            location: get("location").map(str::to_string),
            category: get("type").and_then(|t| t.parse().ok()),
            status: get("status").and_then(|s| s.parse().ok()),
            bedrooms: get("bedrooms").map(Bucket::parse).unwrap_or_default(),
            parking: get("parking").map(Bucket::parse).unwrap_or_default(),
            price_range: range_from_query(get("price_min"), get("price_max"), bounds.price),
            area_range: range_from_query(get("area_min"), get("area_max"), bounds.area),
        }
    }
}

fn range_from_query(min: Option<&str>, max: Option<&str>, edge: NumRange) -> NumRange {
    let parse = |raw: Option<&str>| {
        raw.and_then(|r| r.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(edge.min, edge.max))
    };
    let (mut lo, mut hi) = (parse(min), parse(max));
    if let (Some(a), Some(b)) = (lo, hi) {
        if a > b {
            (lo, hi) = (Some(b), Some(a));
        }
    }

    NumRange {
        min: lo.filter(|v| *v > edge.min).unwrap_or(NumRange::OPEN.min),
        max: hi.filter(|v| *v < edge.max).unwrap_or(NumRange::OPEN.max),
    }
}

/// Whether one listing satisfies every active criterion.
pub fn matches(listing: &Listing, criteria: &FilterCriteria) -> bool {
    let term = criteria.search_term.trim().to_lowercase();
    if !term.is_empty()
        && !listing.id.to_lowercase().contains(&term)
        && !listing.title.to_lowercase().contains(&term)
    {
        return false;
    }

    if let Some(location) = &criteria.location {
        if listing.location != *location {
            return false;
        }
    }
    if let Some(category) = criteria.category {
        if listing.category != category {
            return false;
        }
    }
    if let Some(status) = criteria.status {
        if listing.status != status {
            return false;
        }
    }

    // Overridden values are exempt from their numeric filter.
    let bucket_ok = |bucket: Bucket, value: Option<u32>| value.map_or(true, |n| bucket.matches(n));
    let range_ok = |range: NumRange, value: Option<f64>| value.map_or(true, |v| range.contains(v));

    bucket_ok(criteria.bedrooms, listing.bedrooms.exact())
        && bucket_ok(criteria.parking, listing.parking.exact())
        && range_ok(criteria.price_range, listing.price.exact())
        && range_ok(criteria.area_range, listing.area.exact())
}

/// Listings satisfying all criteria, in input order.
pub fn filter(listings: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| matches(l, criteria))
        .cloned()
        .collect()
}
