// templates/pages/home.rs

use crate::auth::SessionContext;
use crate::db::contact::ContactMessage;
use crate::domain::listing::Listing;
use crate::templates::{
    components::{contact_section, property_card},
    desktop_layout,
};
use maud::{html, Markup};

pub fn hero() -> Markup {
    html! {
        section id="inicio" class="hero" {
            p class="pill" { "★ Corretora de Confiança" }
            h1 { "A chave para o seu " span class="accent" { "imóvel dos sonhos" } }
            p class="lead" {
                "Encontre casas, apartamentos e terrenos com atendimento personalizado e a transparência que você merece."
            }
            div class="hero-actions" {
                a href="#destaques" class="btn-hero" { "Ver Imóveis em Destaque →" }
                a href="#contato" class="btn-outline" { "Fale Conosco" }
            }
            dl class="stats" {
                div { dt { "100+" } dd { "Imóveis Vendidos" } }
                div { dt { "7+" } dd { "Anos de Experiência" } }
                div { dt { "98%" } dd { "Clientes Satisfeitos" } }
                div { dt { "24h" } dd { "Atendimento" } }
            }
        }
    }
}

fn about() -> Markup {
    html! {
        section id="sobre" class="section about" {
            h2 class="heading-section" { "Quem somos" }
            p class="lead" {
                "Uma corretora comprometida em transformar sonhos em realidade através do mercado imobiliário."
            }
            ul class="values" {
                li { strong { "Confiança" } " Transparência total em todas as negociações" }
                li { strong { "Atendimento Personalizado" } " Cada cliente é único e merece atenção especial" }
                li { strong { "Excelência" } " Padrão de qualidade reconhecido no mercado" }
                li { strong { "Experiência" } " Anos conectando pessoas aos seus lares" }
            }
        }
    }
}

pub fn home_page(ctx: &SessionContext, featured: &[Listing]) -> Markup {
    desktop_layout(
        "Início",
        ctx,
        html! {
            main {
                (hero())

                section id="destaques" class="section" {
                    h2 class="heading-section" { "Nossos Imóveis em Destaque" }
                    p class="lead" {
                        "Uma seleção cuidadosa dos melhores imóveis disponíveis, com qualidade e localização privilegiada."
                    }
                    @if featured.is_empty() {
                        p class="muted" { "Nenhum imóvel disponível no momento." }
                    } @else {
                        div class="card-grid" {
                            @for listing in featured {
                                (property_card(listing))
                            }
                        }
                    }
                    p class="center" { a href="/imoveis" class="btn-outline" { "Ver todos os imóveis" } }
                }

                (about())
                (contact_section(&ContactMessage::default(), None))
            }
        },
    )
}
