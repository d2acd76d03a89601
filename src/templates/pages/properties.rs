use crate::auth::SessionContext;
use crate::domain::filter::{CatalogBounds, FilterCriteria};
use crate::domain::listing::Listing;
use crate::templates::{
    components::{filters_form, property_card},
    desktop_layout,
};
use maud::{html, Markup};

pub struct CatalogVm<'a> {
    pub criteria: &'a FilterCriteria,
    pub bounds: &'a CatalogBounds,
    pub results: &'a [Listing],
    pub total: usize,
}

fn result_count(shown: usize, total: usize) -> String {
    match shown {
        1 => format!("1 imóvel encontrado de {total}"),
        n => format!("{n} imóveis encontrados de {total}"),
    }
}

pub fn properties_page(ctx: &SessionContext, vm: &CatalogVm) -> Markup {
    desktop_layout(
        "Imóveis",
        ctx,
        html! {
            main class="container" {
                h1 class="heading-section" { "Todos os Imóveis" }
                (filters_form(vm.criteria, vm.bounds))

                p class="muted result-count" { (result_count(vm.results.len(), vm.total)) }

                @if vm.results.is_empty() {
                    div class="empty-state" {
                        p { "Nenhum imóvel encontrado com esses filtros." }
                        a href="/imoveis" class="link" { "Limpar filtros" }
                    }
                } @else {
                    div class="card-grid" {
                        @for listing in vm.results {
                            (property_card(listing))
                        }
                    }
                }
            }
        },
    )
}
