use crate::domain::currency::format_currency_short;
use crate::domain::filter::{Bucket, CatalogBounds, FilterCriteria, NumRange};
use crate::domain::listing::{Category, ListingStatus};
use maud::{html, Markup};

/// Input value for one end of a range; empty when that side is open.
fn endpoint(value: f64, open: f64) -> String {
    if value == open || !value.is_finite() {
        String::new()
    } else {
        format!("{value:.0}")
    }
}

fn bucket_select(name: &str, label: &str, current: Bucket) -> Markup {
    html! {
        label {
            (label)
            select name=(name) {
                @for choice in Bucket::CHOICES {
                    option value=(choice.code()) selected[choice == current] { (choice.label()) }
                }
            }
        }
    }
}

fn range_inputs(prefix: &str, label: &str, range: NumRange, edge: NumRange, money: bool) -> Markup {
    let hint = |v: f64| {
        if money {
            format_currency_short(v)
        } else {
            format!("{v:.0} m²")
        }
    };
    html! {
        fieldset class="range" {
            legend { (label) " " span class="muted" { "(" (hint(edge.min)) " – " (hint(edge.max)) ")" } }
            input type="number" name=(format!("{prefix}_min")) min=(format!("{:.0}", edge.min)) max=(format!("{:.0}", edge.max))
                placeholder="mín" value=(endpoint(range.min, NumRange::OPEN.min));
            input type="number" name=(format!("{prefix}_max")) min=(format!("{:.0}", edge.min)) max=(format!("{:.0}", edge.max))
                placeholder="máx" value=(endpoint(range.max, NumRange::OPEN.max));
        }
    }
}

pub fn filters_form(criteria: &FilterCriteria, bounds: &CatalogBounds) -> Markup {
    html! {
        form method="get" action="/imoveis" class="filters" {
            label {
                "Buscar"
                input type="search" name="q" value=(criteria.search_term)
                    placeholder="Código ou título";
            }
            label {
                "Localização"
                select name="location" {
                    option value="all" { "Todas" }
                    @for loc in &bounds.locations {
                        option value=(loc) selected[criteria.location.as_deref() == Some(loc.as_str())] { (loc) }
                    }
                }
            }
            label {
                "Tipo"
                select name="type" {
                    option value="all" { "Todos" }
                    @for cat in Category::ALL {
                        option value=(cat.code()) selected[criteria.category == Some(cat)] { (cat.label()) }
                    }
                }
            }
            label {
                "Situação"
                select name="status" {
                    option value="all" { "Todas" }
                    @for status in ListingStatus::ALL {
                        option value=(status.code()) selected[criteria.status == Some(status)] { (status.label()) }
                    }
                }
            }
            (bucket_select("bedrooms", "Quartos", criteria.bedrooms))
            (bucket_select("parking", "Vagas", criteria.parking))
            (range_inputs("price", "Preço", criteria.price_range, bounds.price, true))
            (range_inputs("area", "Área", criteria.area_range, bounds.area, false))

            div class="filters-actions" {
                button type="submit" class="primary" { "Filtrar" }
                @if criteria.has_active_filters() {
                    a href="/imoveis" class="link" { "Limpar filtros" }
                }
            }
        }
    }
}
