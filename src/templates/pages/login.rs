use crate::auth::SessionContext;
use crate::templates::{components::email_cta_form, desktop_layout};
use maud::{html, Markup};

pub fn login_page(ctx: &SessionContext) -> Markup {
    desktop_layout(
        "Entrar",
        ctx,
        html! {
            main class="container narrow" {
                h1 { "Entrar" }
                p class="lead" {
                    "Informe seu e-mail e enviaremos um link seguro de acesso ao painel."
                }

                (email_cta_form())
            }
        },
    )
}
