use crate::auth::SessionContext;
use maud::{html, Markup, DOCTYPE};

pub const SITE_NAME: &str = "Cristal Imóveis";

pub fn desktop_layout(title: &str, ctx: &SessionContext, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | " (SITE_NAME) }
                link rel="stylesheet" href="/static/main.css";
                script src="https://unpkg.com/htmx.org@1.9.12" defer {};
            }
            body {
              header class="site-header" {
                  a href="/" class="brand" {
                      svg
                          xmlns="http://www.w3.org/2000/svg"
                          width="24"
                          height="24"
                          viewBox="0 0 24 24"
                          fill="none"
                          stroke="currentColor"
                          stroke-width="2"
                          stroke-linecap="round"
                          stroke-linejoin="round"
                      {
                          path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                          path d="M5 12l-2 0l9 -9l9 9l-2 0" {}
                          path d="M5 12v7a2 2 0 0 0 2 2h10a2 2 0 0 0 2 -2v-7" {}
                          path d="M9 21v-6a2 2 0 0 1 2 -2h2a2 2 0 0 1 2 2v6" {}
                      }
                      span { (SITE_NAME) }
                  }
                  nav {
                      ul {
                          li { a href="/" { "Início" } }
                          li { a href="/imoveis" { "Imóveis" } }
                          li { a href="/#sobre" { "Sobre" } }
                          li { a href="/#contato" { "Contato" } }
                          @if ctx.is_admin() {
                              li { a href="/admin" { "Admin" } }
                          }
                      }
                  }

                  @if ctx.is_authenticated() {
                      form method="post" action="/logout" class="inline" {
                          button type="submit" class="link" { "Sair" }
                      }
                  } @else {
                      a href="/login" class="login-link" { "Entrar" }
                  }
              }
                (content)
              footer class="site-footer" {
                  p { "© " (SITE_NAME) ". Todos os direitos reservados." }
              }
            }
        }
    }
}
