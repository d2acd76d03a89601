use crate::domain::listing::ListingImage;
use crate::domain::sequencing::Direction;
use maud::{html, Markup};

/// A reorder that failed to persist and can be sent again as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryAction {
    Move { index: usize, direction: Direction },
    Promote { image_id: String },
    Remove { image_id: String },
}

fn base(listing_id: &str) -> String {
    format!("/admin/imoveis/{listing_id}/imagens")
}

fn move_form(listing_id: &str, index: usize, direction: Direction, enabled: bool, label: &str) -> Markup {
    html! {
        form method="post" action=(format!("{}/mover", base(listing_id))) class="inline" {
            input type="hidden" name="index" value=(index);
            input type="hidden" name="direction" value=(direction.code());
            button type="submit" class="icon" title=(label) disabled[!enabled] {
                @match direction {
                    Direction::Up => "↑",
                    Direction::Down => "↓",
                }
            }
        }
    }
}

/// Re-submits exactly the operation that failed.
pub fn retry_form(listing_id: &str, action: &RetryAction) -> Markup {
    let label = "Tentar novamente";
    match action {
        RetryAction::Move { index, direction } => html! {
            form method="post" action=(format!("{}/mover", base(listing_id))) class="inline" {
                input type="hidden" name="index" value=(index);
                input type="hidden" name="direction" value=(direction.code());
                button type="submit" class="primary" { (label) }
            }
        },
        RetryAction::Promote { image_id } => html! {
            form method="post" action=(format!("{}/{image_id}/capa", base(listing_id))) class="inline" {
                button type="submit" class="primary" { (label) }
            }
        },
        RetryAction::Remove { image_id } => html! {
            form method="post" action=(format!("{}/{image_id}/remover", base(listing_id))) class="inline" {
                button type="submit" class="primary" { (label) }
            }
        },
    }
}

/// Ordered grid; position 0 is the cover.
pub fn image_grid(listing_id: &str, images: &[ListingImage]) -> Markup {
    let total = images.len();
    html! {
        @if images.is_empty() {
            div class="empty-state" { p { "Nenhuma imagem adicionada" } }
        } @else {
            p class="muted" { "Use os botões para reordenar. A primeira imagem será a capa." }
            ol class="image-grid" {
                @for (index, image) in images.iter().enumerate() {
                    li class=(if index == 0 { "image-tile cover" } else { "image-tile" }) data-image-id=(image.id) {
                        img src=(image.url) alt=(format!("Imagem {}", index + 1)) loading="lazy";
                        @if index == 0 {
                            span class="badge" { "★ Capa" }
                        }
                        span class="position" { (index + 1) " / " (total) }
                        div class="tile-actions" {
                            (move_form(listing_id, index, Direction::Up, index > 0, "Mover para cima"))
                            (move_form(listing_id, index, Direction::Down, index + 1 < total, "Mover para baixo"))
                            @if index != 0 {
                                form method="post" action=(format!("{}/{}/capa", base(listing_id), image.id)) class="inline" {
                                    button type="submit" class="icon" title="Definir como capa" { "★" }
                                }
                            }
                            form method="post" action=(format!("{}/{}/remover", base(listing_id), image.id)) class="inline"
                                onsubmit="return confirm('Remover esta imagem?');" {
                                button type="submit" class="icon danger" title="Remover" { "✕" }
                            }
                        }
                    }
                }
            }
        }
    }
}
