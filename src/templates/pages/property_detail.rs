use crate::auth::SessionContext;
use crate::domain::listing::Listing;
use crate::templates::{
    components::contact_form::{CONTACT_PHONE, CONTACT_WHATSAPP},
    components::property_card::{area_text, price_text, PLACEHOLDER_IMAGE},
    desktop_layout,
};
use maud::{html, Markup};

pub fn property_detail_page(ctx: &SessionContext, listing: &Listing) -> Markup {
    desktop_layout(
        &listing.title,
        ctx,
        html! {
            main class="container detail" {
                a href="/imoveis" class="link" { "← Voltar" }

                div class="detail-grid" {
                    div class="gallery" {
                        @if listing.images.is_empty() {
                            img src=(PLACEHOLDER_IMAGE) alt=(listing.title);
                        }
                        @for (i, image) in listing.images.iter().enumerate() {
                            figure {
                                img src=(image.url) alt=(format!("{} - Foto {}", listing.title, i + 1)) loading="lazy";
                            }
                        }
                    }

                    div class="detail-info" {
                        span class="badge" { (listing.category.label()) }
                        span class="badge muted" { (listing.status.label()) }
                        h1 class="heading-section" { (listing.title) }
                        p class="muted" { (listing.location) " · Código " code { (listing.id) } }
                        p class="price-lg" { (price_text(&listing.price)) }

                        dl class="facts-grid" {
                            div { dt { (listing.bedrooms.to_string()) } dd { "Quartos" } }
                            div { dt { (listing.bathrooms.to_string()) } dd { "Banheiros" } }
                            div { dt { (listing.parking.to_string()) } dd { "Vagas" } }
                            div { dt { (area_text(&listing.area)) } dd { "Área" } }
                        }

                        @if let Some(description) = &listing.description {
                            h2 { "Descrição" }
                            p class="description" { (description) }
                        }

                        div class="detail-actions" {
                            a href=(CONTACT_WHATSAPP) target="_blank" rel="noopener noreferrer" class="btn-hero" { "WhatsApp" }
                            a href=(format!("tel:{CONTACT_PHONE}")) class="btn-outline" { "Ligar" }
                        }
                    }
                }
            }
        },
    )
}
