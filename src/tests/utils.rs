use crate::app::{now_naive, now_unix, App};
use crate::auth::sessions::SESSION_COOKIE;
use crate::config::AppConfig;
use crate::db::connection::init_db;
use crate::db::images::{insert_images, new_image};
use crate::db::listings::insert_listing;
use crate::db::magic_auth::{redeem_magic_link, request_magic_link};
use crate::domain::listing::{ListingDraft, ListingImage};
use crate::domain::sequencing::append_new;
use astra::{Body, Request, Response};
use http::Method;
use std::collections::HashMap;
use std::io::Read;
use tempfile::TempDir;

pub const ADMIN_EMAIL: &str = "admin@example.com";

/// A fresh app on its own database file and upload directory.
/// Keep the TempDir alive for the duration of the test.
pub fn init_test_app() -> (TempDir, App) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        db_path: dir.path().join("test.sqlite3").to_string_lossy().to_string(),
        upload_dir: dir.path().join("uploads"),
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        ..AppConfig::default()
    };
    let app = App::new(config);

    init_db(&app.db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    app.store.ensure_root().unwrap();

    (dir, app)
}

/// Go through the magic-link flow and return the raw session token.
pub fn sign_in(app: &App, email: &str) -> String {
    let now = now_unix();
    let issued = request_magic_link(&app.db, email, now).expect("Failed to request link");
    redeem_magic_link(&app.db, &app.config, &issued.token, now)
        .expect("Failed to redeem")
        .session_token
}

pub fn cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}")
}

pub fn get(uri: &str, session: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = session {
        builder = builder.header("Cookie", cookie(token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, session: Option<&str>) -> Request {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(token) = session {
        builder = builder.header("Cookie", cookie(token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub fn draft(pairs: &[(&str, &str)]) -> ListingDraft {
    let mut form: HashMap<String, String> = [
        ("title", "Apartamento Jardins"),
        ("type", "apartamento"),
        ("location", "São Paulo"),
        ("status", "disponivel"),
        ("price", "850000"),
        ("bedrooms", "3"),
        ("bathrooms", "2"),
        ("parking", "2"),
        ("area", "120"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in pairs {
        form.insert(k.to_string(), v.to_string());
    }
    ListingDraft::from_form(&form).unwrap()
}

pub fn seed_listing(app: &App, pairs: &[(&str, &str)]) -> String {
    let draft = draft(pairs);
    app.db
        .with_conn(|conn| insert_listing(conn, &draft, now_naive()))
        .unwrap()
}

/// Attach `count` URL images in order; the first one is the cover.
pub fn seed_images(app: &App, listing_id: &str, count: usize) -> Vec<ListingImage> {
    let fresh = (0..count)
        .map(|i| new_image(listing_id, &format!("https://img.example.com/{i}.jpg"), None))
        .collect();
    let images = append_new(Vec::new(), fresh);
    app.db
        .with_conn(|conn| insert_images(conn, &images, now_naive()))
        .unwrap();
    images
}
