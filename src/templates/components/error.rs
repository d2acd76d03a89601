use maud::{html, Markup, DOCTYPE};

/// Standalone error page. Rendered without the site layout so it still
/// works when the session lookup itself failed.
pub fn error_page(status: u16, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                title { "Erro " (status) }
                link rel="stylesheet" href="/static/main.css";
            }
            body {
                main class="container narrow error-page" {
                    h1 { "Erro " (status) }
                    p { (message) }
                    p { a href="/" { "← Voltar para o início" } }
                }
            }
        }
    }
}
