// src/mailer.rs

use maud::html;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::MailConfig;
use crate::db::contact::ContactMessage;
use crate::errors::ServerError;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: String,
}

impl BrevoMailer {
    pub fn new(api_key: String, sender_email: String, sender_name: String) -> Self {
        Self {
            api_key,
            sender_email,
            sender_name,
            client: Client::new(),
        }
    }

    pub fn from_config(cfg: &MailConfig) -> Self {
        Self::new(
            cfg.api_key.clone(),
            cfg.sender_email.clone(),
            cfg.sender_name.clone(),
        )
    }

    pub fn send_magic_link(&self, recipient_email: &str, magic_link: &str) -> Result<(), ServerError> {
        let html_content = magic_link_html(magic_link);
        self.send(BrevoPayload {
            sender: self.sender(),
            to: vec![BrevoRecipient {
                email: recipient_email,
            }],
            reply_to: None,
            subject: "Seu link de acesso",
            html_content,
        })
    }

    /// Forward a contact-form message to the site owner. Replies go to the visitor.
    pub fn send_contact_notification(
        &self,
        inbox: &str,
        msg: &ContactMessage,
    ) -> Result<(), ServerError> {
        let subject = format!("Nova mensagem de {}", msg.name);
        self.send(BrevoPayload {
            sender: self.sender(),
            to: vec![BrevoRecipient { email: inbox }],
            reply_to: Some(BrevoRecipient { email: &msg.email }),
            subject: &subject,
            html_content: contact_html(msg),
        })
    }

    fn sender(&self) -> BrevoSender<'_> {
        BrevoSender {
            name: &self.sender_name,
            email: &self.sender_email,
        }
    }

    fn send(&self, payload: BrevoPayload<'_>) -> Result<(), ServerError> {
        let resp = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| ServerError::MailerError(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ServerError::MailerError(format!(
                "Brevo answered {status}: {error_body}"
            )));
        }

        tracing::debug!(subject = payload.subject, "mail sent");
        Ok(())
    }
}

fn magic_link_html(magic_link: &str) -> String {
    html! {
        h1 { "Acesso ao painel" }
        p { "Clique no link abaixo para entrar. Ele expira em 15 minutos e só pode ser usado uma vez." }
        p { a href=(magic_link) { "Entrar no painel" } }
        p { "Se você não pediu este link, pode ignorar este e-mail." }
    }
    .into_string()
}

fn contact_html(msg: &ContactMessage) -> String {
    html! {
        h2 { "Nova mensagem pelo site" }
        p { strong { "Nome: " } (msg.name) }
        p { strong { "E-mail: " } (msg.email) }
        @if let Some(phone) = &msg.phone {
            p { strong { "Telefone: " } (phone) }
        }
        p style="white-space: pre-line;" { (msg.message) }
    }
    .into_string()
}
