// src/domain/listing.rs

use chrono::NaiveDateTime;
use rand::Rng;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("unknown {kind} code: {code:?}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: String,
}

/// Kind of property. Stored by its Portuguese code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Apartment,
    House,
    Penthouse,
    Land,
    Commercial,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Apartment,
        Category::House,
        Category::Penthouse,
        Category::Land,
        Category::Commercial,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Category::Apartment => "apartamento",
            Category::House => "casa",
            Category::Penthouse => "cobertura",
            Category::Land => "terreno",
            Category::Commercial => "comercial",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Apartment => "Apartamento",
            Category::House => "Casa",
            Category::Penthouse => "Cobertura",
            Category::Land => "Terreno",
            Category::Commercial => "Comercial",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| UnknownCode {
                kind: "category",
                code: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingStatus {
    Available,
    Sold,
    Rented,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Available,
        ListingStatus::Sold,
        ListingStatus::Rented,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ListingStatus::Available => "disponivel",
            ListingStatus::Sold => "vendido",
            ListingStatus::Rented => "alugado",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingStatus::Available => "Disponível",
            ListingStatus::Sold => "Vendido",
            ListingStatus::Rented => "Alugado",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingStatus::ALL
            .into_iter()
            .find(|st| st.code() == s)
            .ok_or_else(|| UnknownCode {
                kind: "status",
                code: s.to_string(),
            })
    }
}

macro_rules! sql_code_enum {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.code()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

sql_code_enum!(Category);
sql_code_enum!(ListingStatus);

/// A numeric attribute that the agent may replace with free text for display
/// (e.g. "3 ou 4" bedrooms, "Sob consulta" price).
///
/// Numeric filters only ever look at `Exact`; a listing carrying an `Override`
/// is exempt from that one filter.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericOrDisplay<T> {
    Exact(T),
    Override(String),
}

impl<T: Copy> NumericOrDisplay<T> {
    /// A non-blank display text wins over the stored number.
    pub fn from_parts(value: T, display: Option<String>) -> Self {
        match display {
            Some(text) if !text.trim().is_empty() => {
                NumericOrDisplay::Override(text.trim().to_string())
            }
            _ => NumericOrDisplay::Exact(value),
        }
    }

    pub fn exact(&self) -> Option<T> {
        match self {
            NumericOrDisplay::Exact(v) => Some(*v),
            NumericOrDisplay::Override(_) => None,
        }
    }

    pub fn display_text(&self) -> Option<&str> {
        match self {
            NumericOrDisplay::Exact(_) => None,
            NumericOrDisplay::Override(text) => Some(text),
        }
    }
}

impl<T: fmt::Display> fmt::Display for NumericOrDisplay<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericOrDisplay::Exact(v) => write!(f, "{v}"),
            NumericOrDisplay::Override(text) => f.write_str(text),
        }
    }
}

/// One image attached to a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingImage {
    pub id: String,
    pub listing_id: String,
    pub url: String,
    /// Bucket key when the file was uploaded here; `None` for external URLs.
    pub storage_key: Option<String>,
    pub is_primary: bool,
    pub display_order: Option<i64>,
}

impl ListingImage {
    pub fn order(&self) -> i64 {
        self.display_order.unwrap_or(0)
    }
}

/// A property as read from the `properties` table, images attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub location: String,
    pub status: ListingStatus,
    pub price: NumericOrDisplay<f64>,
    pub bedrooms: NumericOrDisplay<u32>,
    pub bathrooms: NumericOrDisplay<u32>,
    pub parking: NumericOrDisplay<u32>,
    pub area: NumericOrDisplay<f64>,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    /// Sorted by display order.
    pub images: Vec<ListingImage>,
}

const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const LISTING_CODE_LEN: usize = 8;

/// Short human-typeable reference code used as the listing id.
pub fn generate_listing_code<R: Rng>(rng: &mut R) -> String {
    (0..LISTING_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Validated content of the admin create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub location: String,
    pub status: ListingStatus,
    pub price: f64,
    pub price_display: Option<String>,
    pub bedrooms: u32,
    pub bedrooms_display: Option<String>,
    pub bathrooms: u32,
    pub bathrooms_display: Option<String>,
    pub parking: u32,
    pub parking_display: Option<String>,
    pub area: f64,
    pub area_display: Option<String>,
    pub is_featured: bool,
}

/// Accepts "850000", "850.000", "850.000,50" and "R$ 850.000".
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if cleaned.matches('.').count() > 1
        || cleaned.rsplit('.').next().is_some_and(|tail| tail.len() == 3)
    {
        // Dots used as thousands separators.
        cleaned.replace('.', "")
    } else {
        cleaned
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl ListingDraft {
    /// Validate the url-encoded form. Every problem is reported, not just the first.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let text = |key: &str| {
            form.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let title = text("title").unwrap_or_default();
        if title.chars().count() < 3 {
            errors.push(FieldError::new(
                "title",
                "Título deve ter no mínimo 3 caracteres",
            ));
        }

        let location = text("location").unwrap_or_default();
        if location.chars().count() < 3 {
            errors.push(FieldError::new("location", "Localização obrigatória"));
        }

        let category = match text("type").map(|t| t.parse::<Category>()) {
            Some(Ok(c)) => Some(c),
            _ => {
                errors.push(FieldError::new("type", "Selecione o tipo"));
                None
            }
        };

        let status = match text("status").map(|s| s.parse::<ListingStatus>()) {
            None => ListingStatus::Available,
            Some(Ok(s)) => s,
            Some(Err(_)) => {
                errors.push(FieldError::new("status", "Status inválido"));
                ListingStatus::Available
            }
        };

        let price_display = text("price_display");
        let price = match text("price").map(|p| parse_decimal(&p)) {
            Some(Some(p)) if p > 0.0 => p,
            Some(Some(p)) if p == 0.0 && price_display.is_some() => p,
            None if price_display.is_some() => 0.0,
            _ => {
                errors.push(FieldError::new("price", "Preço deve ser positivo"));
                0.0
            }
        };

        let area_display = text("area_display");
        let area = match text("area").map(|a| parse_decimal(&a)) {
            Some(Some(a)) if a > 0.0 => a,
            Some(Some(a)) if a == 0.0 && area_display.is_some() => a,
            None if area_display.is_some() => 0.0,
            _ => {
                errors.push(FieldError::new("area", "Área deve ser positiva"));
                0.0
            }
        };

        let mut count = |field: &'static str| -> u32 {
            match text(field) {
                None => 0,
                Some(raw) => match raw.parse::<u32>() {
                    Ok(n) => n,
                    Err(_) => {
                        errors.push(FieldError::new(field, "Informe um número inteiro"));
                        0
                    }
                },
            }
        };
        let bedrooms = count("bedrooms");
        let bathrooms = count("bathrooms");
        let parking = count("parking");

        let is_featured = matches!(
            form.get("is_featured").map(String::as_str),
            Some("on") | Some("true") | Some("1")
        );

        match category {
            Some(category) if errors.is_empty() => Ok(ListingDraft {
                title,
                description: text("description"),
                category,
                location,
                status,
                price,
                price_display,
                bedrooms,
                bedrooms_display: text("bedrooms_display"),
                bathrooms,
                bathrooms_display: text("bathrooms_display"),
                parking,
                parking_display: text("parking_display"),
                area,
                area_display,
                is_featured,
            }),
            _ => Err(errors),
        }
    }

}
