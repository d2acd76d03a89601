use crate::domain::currency::{format_currency, format_currency_full};
use crate::domain::listing::{Listing, NumericOrDisplay};
use crate::domain::sequencing::primary_image;
use maud::{html, Markup};

pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.svg";

/// "R$ 850.000", or the override text ("Sob consulta").
pub fn price_text(price: &NumericOrDisplay<f64>) -> String {
    match price {
        NumericOrDisplay::Exact(v) => format_currency_full(*v),
        NumericOrDisplay::Override(text) => text.clone(),
    }
}

/// Compact price for cards: "R$ 850 mil".
pub fn price_compact(price: &NumericOrDisplay<f64>) -> String {
    match price {
        NumericOrDisplay::Exact(v) => format_currency(*v),
        NumericOrDisplay::Override(text) => text.clone(),
    }
}

pub fn area_text(area: &NumericOrDisplay<f64>) -> String {
    match area {
        NumericOrDisplay::Exact(v) if v.fract() == 0.0 => format!("{v:.0} m²"),
        NumericOrDisplay::Exact(v) => format!("{} m²", format!("{v:.1}").replace('.', ",")),
        NumericOrDisplay::Override(text) => text.clone(),
    }
}

pub fn cover_url(listing: &Listing) -> &str {
    primary_image(&listing.images)
        .map(|img| img.url.as_str())
        .unwrap_or(PLACEHOLDER_IMAGE)
}

pub fn property_card(listing: &Listing) -> Markup {
    let href = format!("/imoveis/{}", listing.id);
    html! {
        article class="card-property" {
            a href=(href) class="card-image" {
                img src=(cover_url(listing)) alt=(listing.title) loading="lazy";
                span class="badge" { (listing.category.label()) }
            }
            div class="card-body" {
                p class="muted location" { (listing.location) }
                h3 { a href=(href) { (listing.title) } }
                ul class="facts" {
                    li { (listing.bedrooms.to_string()) " quartos" }
                    li { (listing.bathrooms.to_string()) " banheiros" }
                    li { (listing.parking.to_string()) " vagas" }
                    li { (area_text(&listing.area)) }
                }
                div class="card-footer" {
                    strong class="price" { (price_compact(&listing.price)) }
                    a href=(href) class="btn-outline" { "Ver detalhes" }
                }
            }
        }
    }
}
