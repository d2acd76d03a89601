use crate::auth::SessionContext;
use crate::domain::listing::{Listing, ListingImage};
use crate::templates::components::{image_grid, notice, retry_form, NoticeKind, RetryAction};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct ImageManagerVm<'a> {
    pub listing: &'a Listing,
    /// In display order, as persisted.
    pub images: &'a [ListingImage],
    pub notice: Option<(NoticeKind, String)>,
    pub retry: Option<RetryAction>,
}

pub fn admin_images_page(ctx: &SessionContext, vm: &ImageManagerVm) -> Markup {
    let id = &vm.listing.id;
    desktop_layout(
        "Imagens",
        ctx,
        html! {
            main class="container" {
                a href="/admin" class="link" { "← Voltar ao painel" }
                h1 { "Imagens de " (vm.listing.title) }
                p class="muted" { "Código " code { (id) } }

                @if let Some((kind, message)) = &vm.notice {
                    div class="notice-row" {
                        (notice(*kind, message))
                        @if let Some(action) = &vm.retry {
                            (retry_form(id, action))
                        }
                    }
                }

                (image_grid(id, vm.images))

                section class="card" {
                    h3 { "Enviar arquivo" }
                    form method="post" action=(format!("/admin/imoveis/{id}/imagens/upload"))
                        enctype="multipart/form-data" {
                        input type="file" name="file" accept=".jpg,.jpeg,.png,.webp,.gif" required;
                        button type="submit" class="primary" { "Enviar" }
                    }
                }

                section class="card" {
                    h3 { "Adicionar por URL" }
                    form method="post" action=(format!("/admin/imoveis/{id}/imagens")) {
                        textarea name="urls" rows="4" placeholder="Uma URL por linha" required {}
                        button type="submit" class="primary" { "Adicionar" }
                    }
                }
            }
        },
    )
}
