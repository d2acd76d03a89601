// src/app.rs
use chrono::{NaiveDateTime, Utc};

use crate::config::AppConfig;
use crate::db::Database;
use crate::mailer::BrevoMailer;
use crate::storage::LocalBucket;

/// Everything a request handler needs, shared by all workers.
pub struct App {
    pub db: Database,
    pub config: AppConfig,
    /// `None` when no mail API key is configured.
    pub mailer: Option<BrevoMailer>,
    pub store: LocalBucket,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            db: Database::new(config.db_path.clone()),
            mailer: config.mail.as_ref().map(BrevoMailer::from_config),
            store: LocalBucket::new(config.upload_dir.clone()),
            config,
        }
    }
}

pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}
