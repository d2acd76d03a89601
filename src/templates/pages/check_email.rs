use crate::auth::SessionContext;
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Returns the partial HTML content for the success message.
/// Used for HTMX swaps to replace the login form.
pub fn check_email_content(email: &str) -> Markup {
    html! {
        div class="check-email fade-in" {
            h3 { "Verifique seu e-mail" }
            p {
                "Enviamos um link de acesso para "
                strong { (email) }
                "."
            }
            p class="muted" { "O link expira em 15 minutos e só pode ser usado uma vez." }
            a href="/login" class="link" { "Usar outro e-mail" }
        }
    }
}

/// Full page for browsers that posted the form without htmx.
pub fn check_email_page(ctx: &SessionContext, email: &str) -> Markup {
    desktop_layout(
        "Verifique seu e-mail",
        ctx,
        html! {
            main class="container narrow" {
                (check_email_content(email))
            }
        },
    )
}
