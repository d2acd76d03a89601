// src/db/magic_auth.rs
use crate::auth::magic::{IssuedMagicLink, MagicLinks};
use crate::auth::sessions::create_session;
use crate::config::AppConfig;
use crate::db::auth::{grant_role, touch_last_login, ROLE_ADMIN};
use crate::db::connection::Database;
use crate::errors::ServerError;

/// A redeemed link turned into a live session.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user_id: i64,
    pub email: String,
    /// Raw session token for the cookie.
    pub session_token: String,
}

/// Request a magic link: creates the user if needed and stores the hashed token.
/// Returns the issued link (raw token included so caller can email/log).
pub fn request_magic_link(
    db: &Database,
    email: &str,
    now: i64,
) -> Result<IssuedMagicLink, ServerError> {
    db.with_conn(|conn| MagicLinks::default().issue(conn, email, now))
}

/// Redeem a magic link token (single-use), grant the admin role to configured
/// emails, update last_login_at and open a session.
pub fn redeem_magic_link(
    db: &Database,
    config: &AppConfig,
    token: &str,
    now: i64,
) -> Result<SignedIn, ServerError> {
    db.with_conn(|conn| {
        let redeemed = MagicLinks::default().redeem(conn, token, now)?;

        if config.is_admin_email(&redeemed.email) {
            grant_role(conn, redeemed.user_id, ROLE_ADMIN, now)?;
            tracing::info!(email = %redeemed.email, "admin role granted");
        }
        touch_last_login(conn, redeemed.user_id, now)?;
        let session_token = create_session(conn, redeemed.user_id, now)?;

        Ok(SignedIn {
            user_id: redeemed.user_id,
            email: redeemed.email,
            session_token,
        })
    })
}
