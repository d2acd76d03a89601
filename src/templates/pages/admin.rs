use crate::auth::SessionContext;
use crate::domain::currency::format_currency_short;
use crate::domain::listing::{Listing, NumericOrDisplay};
use crate::templates::components::property_card::cover_url;
use crate::templates::desktop_layout;
use maud::{html, Markup};

fn price_cell(price: &NumericOrDisplay<f64>) -> String {
    match price {
        NumericOrDisplay::Exact(v) => format_currency_short(*v),
        NumericOrDisplay::Override(text) => text.clone(),
    }
}

pub fn admin_page(ctx: &SessionContext, listings: &[Listing]) -> Markup {
    desktop_layout(
        "Painel",
        ctx,
        html! {
            main class="container" {
                div class="admin-header" {
                    h1 { "Painel Administrativo" }
                    a href="/admin/imoveis/novo" class="primary button" { "+ Novo imóvel" }
                }
                @if let Some(user) = ctx.user() {
                    p class="muted" { "Conectado como " strong { (user.email) } }
                }

                @if listings.is_empty() {
                    div class="empty-state" { "Nenhum imóvel cadastrado ainda." }
                } @else {
                    div class="table-wrap" {
                        table class="admin-table" {
                            thead {
                                tr {
                                    th { "" }
                                    th { "Código" }
                                    th { "Título" }
                                    th { "Localização" }
                                    th { "Situação" }
                                    th { "Preço" }
                                    th { "Fotos" }
                                    th { "Ações" }
                                }
                            }
                            tbody {
                                @for listing in listings {
                                    tr {
                                        td { img class="thumb" src=(cover_url(listing)) alt=(listing.title); }
                                        td { code { (listing.id) } }
                                        td {
                                            a href=(format!("/imoveis/{}", listing.id)) { (listing.title) }
                                            @if listing.is_featured { " " span class="badge" { "Destaque" } }
                                        }
                                        td { (listing.location) }
                                        td { (listing.status.label()) }
                                        td { (price_cell(&listing.price)) }
                                        td { (listing.images.len()) }
                                        td class="actions" {
                                            a href=(format!("/admin/imoveis/{}/editar", listing.id)) { "Editar" }
                                            a href=(format!("/admin/imoveis/{}/imagens", listing.id)) { "Imagens" }
                                            form action=(format!("/admin/imoveis/{}/excluir", listing.id)) method="post"
                                                onsubmit="return confirm('Tem certeza que deseja excluir este imóvel?');" class="inline" {
                                                button type="submit" class="link danger" { "Excluir" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
