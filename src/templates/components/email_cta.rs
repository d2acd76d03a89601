use maud::{html, Markup};

/// Sign-in form. With htmx the "check your e-mail" partial replaces
/// `#auth-result`; without it the browser gets the full page.
pub fn email_cta_form() -> Markup {
    html! {
        div class="email-cta-wrapper" {
            form method="post" action="/auth/request-link" class="email-cta"
                hx-post="/auth/request-link" hx-target="#auth-result" hx-swap="innerHTML"
                hx-disabled-elt="button"
            {
                label for="email" class="sr-only" { "E-mail" }
                input type="email" id="email" name="email" required
                    autocomplete="email" placeholder="voce@exemplo.com";
                button type="submit" class="primary" {
                    span class="btn-text" { "Receber link de acesso" }
                    span class="spinner" aria-hidden="true" {}
                }
            }
            p class="microcopy" {
                "Enviaremos um link seguro para o seu e-mail. Não é preciso senha."
            }
            div id="auth-result" aria-live="polite" {}
        }
    }
}
