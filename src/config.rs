// src/config.rs
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::ServerError;

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub db_path: String,
    pub schema_path: String,
    pub upload_dir: PathBuf,
    /// Absolute base used when building links that leave the site (emails).
    /// Example: "https://imoveis.example.com"
    pub public_base_url: String,
    /// Lowercased emails that receive the admin role when they sign in.
    pub admin_emails: Vec<String>,
    /// `None` disables outgoing mail; magic links are logged instead.
    pub mail: Option<MailConfig>,
    pub contact_inbox: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: 8,
            db_path: "imovel.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            upload_dir: PathBuf::from("uploads"),
            public_base_url: "http://127.0.0.1:3000".to_string(),
            admin_emails: Vec::new(),
            mail: None,
            contact_inbox: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build from an explicit variable map. Unset or blank variables keep the default.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ServerError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let mut cfg = Self::default();

        if let Some(addr) = get("IMOVEL_BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .map_err(|e| ServerError::BadRequest(format!("IMOVEL_BIND_ADDR: {e}")))?;
        }
        if let Some(n) = get("IMOVEL_MAX_WORKERS") {
            cfg.max_workers = n
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ServerError::BadRequest(format!("IMOVEL_MAX_WORKERS: invalid value {n:?}"))
                })?;
        }
        if let Some(path) = get("IMOVEL_DB_PATH") {
            cfg.db_path = path;
        }
        if let Some(path) = get("IMOVEL_SCHEMA_PATH") {
            cfg.schema_path = path;
        }
        if let Some(dir) = get("IMOVEL_UPLOAD_DIR") {
            cfg.upload_dir = PathBuf::from(dir);
        }
        if let Some(base) = get("IMOVEL_PUBLIC_BASE_URL") {
            cfg.public_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(list) = get("IMOVEL_ADMIN_EMAILS") {
            cfg.admin_emails = list
                .split(',')
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(api_key) = get("BREVO_API_KEY") {
            cfg.mail = Some(MailConfig {
                api_key,
                sender_email: get("IMOVEL_MAIL_FROM")
                    .unwrap_or_else(|| "contato@example.com".to_string()),
                sender_name: get("IMOVEL_MAIL_FROM_NAME").unwrap_or_else(|| "Imóveis".to_string()),
            });
        }
        cfg.contact_inbox = get("IMOVEL_CONTACT_INBOX");

        Ok(cfg)
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}
