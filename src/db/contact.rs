// src/db/contact.rs
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::collections::HashMap;

use crate::errors::ServerError;

/// A message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactMessage {
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, ServerError> {
        let field = |key: &str| form.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let msg = ContactMessage {
            name: field("name"),
            email: field("email").to_lowercase(),
            phone: Some(field("phone")).filter(|p| !p.is_empty()),
            message: field("message"),
        };

        if msg.name.is_empty() {
            return Err(ServerError::BadRequest("Informe seu nome".into()));
        }
        if msg.email.is_empty()
            || !msg.email.contains('@')
            || msg.email.starts_with('@')
            || msg.email.ends_with('@')
        {
            return Err(ServerError::BadRequest("E-mail inválido".into()));
        }
        if msg.message.is_empty() {
            return Err(ServerError::BadRequest("Escreva uma mensagem".into()));
        }
        Ok(msg)
    }
}

pub fn insert_contact_message(
    conn: &Connection,
    msg: &ContactMessage,
    now: NaiveDateTime,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into contact_messages (name, email, phone, message, created_at) values (?, ?, ?, ?, ?)",
        params![msg.name, msg.email, msg.phone, msg.message, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert contact message failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}
