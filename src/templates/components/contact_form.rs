use crate::db::contact::ContactMessage;
use crate::templates::components::notice::{notice, NoticeKind};
use maud::{html, Markup};

pub const CONTACT_PHONE: &str = "(11) 4000-0000";
pub const CONTACT_WHATSAPP: &str = "https://wa.me/551140000000";
pub const CONTACT_EMAIL: &str = "contato@example.com";

/// The `#contato` section. Posting replaces it in place; `values` refills the
/// inputs after a validation error.
pub fn contact_section(values: &ContactMessage, status: Option<(NoticeKind, &str)>) -> Markup {
    html! {
        section id="contato" class="section contact" {
            h2 class="heading-section" { "Fale Conosco" }
            p class="lead" {
                "Pronto para encontrar seu imóvel ideal? Entre em contato e transforme seu sonho em realidade."
            }
            div class="contact-grid" {
                ul class="contact-info" {
                    li { strong { "Telefone" } a href=(format!("tel:{CONTACT_PHONE}")) { (CONTACT_PHONE) } }
                    li { strong { "WhatsApp" } a href=(CONTACT_WHATSAPP) target="_blank" rel="noopener" { (CONTACT_PHONE) } }
                    li { strong { "E-mail" } a href=(format!("mailto:{CONTACT_EMAIL}")) { (CONTACT_EMAIL) } }
                }
                form method="post" action="/contato#contato" class="contact-form" {
                    @if let Some((kind, message)) = status {
                        (notice(kind, message))
                    }
                    label { "Nome" input type="text" name="name" value=(values.name) required; }
                    label { "E-mail" input type="email" name="email" value=(values.email) required; }
                    label { "Telefone" input type="tel" name="phone" value=(values.phone.as_deref().unwrap_or("")); }
                    label { "Mensagem" textarea name="message" rows="5" required { (values.message) } }
                    button type="submit" class="primary" { "Enviar mensagem" }
                }
            }
        }
    }
}
