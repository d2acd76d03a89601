use std::collections::HashMap;

use crate::auth::SessionContext;
use crate::domain::listing::{Category, FieldError, ListingDraft, ListingStatus};
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Raw form values, so a rejected submission comes back as typed.
pub type FormValues = HashMap<String, String>;

fn number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        // Decimal comma, so "1234.567" is not read back as thousands.
        v.to_string().replace('.', ",")
    }
}

pub fn values_from_draft(d: &ListingDraft) -> FormValues {
    let mut values = FormValues::new();
    let mut put = |k: &str, v: String| {
        values.insert(k.to_string(), v);
    };
    put("title", d.title.clone());
    put("description", d.description.clone().unwrap_or_default());
    put("type", d.category.code().to_string());
    put("location", d.location.clone());
    put("status", d.status.code().to_string());
    put("price", number(d.price));
    put("price_display", d.price_display.clone().unwrap_or_default());
    put("bedrooms", d.bedrooms.to_string());
    put("bedrooms_display", d.bedrooms_display.clone().unwrap_or_default());
    put("bathrooms", d.bathrooms.to_string());
    put("bathrooms_display", d.bathrooms_display.clone().unwrap_or_default());
    put("parking", d.parking.to_string());
    put("parking_display", d.parking_display.clone().unwrap_or_default());
    put("area", number(d.area));
    put("area_display", d.area_display.clone().unwrap_or_default());
    if d.is_featured {
        put("is_featured", "on".to_string());
    }
    values
}

pub struct ListingFormVm<'a> {
    /// `None` when creating.
    pub listing_id: Option<&'a str>,
    pub values: &'a FormValues,
    pub errors: &'a [FieldError],
}

impl ListingFormVm<'_> {
    fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    fn error(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn field(&self, name: &str, label: &str, kind: &str) -> Markup {
        html! {
            label class=(if self.error(name).is_some() { "field invalid" } else { "field" }) {
                (label)
                input type=(kind) name=(name) value=(self.value(name));
                @if let Some(msg) = self.error(name) {
                    span class="field-error" { (msg) }
                }
            }
        }
    }

    /// A numeric input plus its free-text display override.
    fn numeric_with_override(&self, name: &str, label: &str) -> Markup {
        let display = format!("{name}_display");
        html! {
            div class="field-pair" {
                (self.field(name, label, "text"))
                label class="field" {
                    "Texto alternativo (opcional)"
                    input type="text" name=(display) value=(self.value(&display)) placeholder="ex.: 3 ou 4";
                }
            }
        }
    }
}

pub fn listing_form_page(ctx: &SessionContext, vm: &ListingFormVm) -> Markup {
    let (title, action) = match vm.listing_id {
        Some(id) => ("Editar imóvel", format!("/admin/imoveis/{id}")),
        None => ("Novo imóvel", "/admin/imoveis".to_string()),
    };

    desktop_layout(
        title,
        ctx,
        html! {
            main class="container narrow" {
                a href="/admin" class="link" { "← Voltar ao painel" }
                h1 { (title) }
                @if !vm.errors.is_empty() {
                    div class="notice notice-error" { "Corrija os campos destacados." }
                }

                form method="post" action=(action) class="listing-form" {
                    (vm.field("title", "Título", "text"))
                    label class="field" {
                        "Descrição"
                        textarea name="description" rows="5" { (vm.value("description")) }
                    }
                    label class=(if vm.error("type").is_some() { "field invalid" } else { "field" }) {
                        "Tipo"
                        select name="type" {
                            option value="" { "Selecione" }
                            @for cat in Category::ALL {
                                option value=(cat.code()) selected[vm.value("type") == cat.code()] { (cat.label()) }
                            }
                        }
                        @if let Some(msg) = vm.error("type") {
                            span class="field-error" { (msg) }
                        }
                    }
                    (vm.field("location", "Localização", "text"))
                    label class="field" {
                        "Situação"
                        select name="status" {
                            @for status in ListingStatus::ALL {
                                option value=(status.code()) selected[vm.value("status") == status.code()] { (status.label()) }
                            }
                        }
                    }
                    (vm.numeric_with_override("price", "Preço (R$)"))
                    (vm.numeric_with_override("bedrooms", "Quartos"))
                    (vm.numeric_with_override("bathrooms", "Banheiros"))
                    (vm.numeric_with_override("parking", "Vagas"))
                    (vm.numeric_with_override("area", "Área (m²)"))
                    label class="checkbox" {
                        input type="checkbox" name="is_featured" checked[!vm.value("is_featured").is_empty()];
                        " Destacar na página inicial"
                    }
                    button type="submit" class="primary" { "Salvar" }
                }
            }
        },
    )
}
