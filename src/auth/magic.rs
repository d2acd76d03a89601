// src/auth/magic.rs
//! Passwordless sign-in: one e-mailed link, valid once, for a short time.
use rusqlite::Connection;

use crate::auth::token::{generate_token_default, hash_token};
use crate::db::auth::{consume_magic_link, get_or_create_user, get_user_email, insert_magic_link};
use crate::errors::ServerError;

pub const DEFAULT_LINK_TTL_SECS: i64 = 15 * 60;
pub const REDEEM_PATH: &str = "/auth/magic";

/// A link that was just stored. `token` is the only copy of the raw secret.
#[derive(Debug, Clone)]
pub struct IssuedMagicLink {
    pub email: String,
    pub user_id: i64,
    pub token: String,
    pub expires_at: i64,
    /// Site-relative: `/auth/magic?token=...`.
    pub link: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedeemedMagicLink {
    pub user_id: i64,
    pub email: String,
}

/// Lowercased, trimmed address. Rejects anything without a single `@`
/// between a non-empty local part and a dotted domain.
pub fn normalize_email(raw: &str) -> Result<String, ServerError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(ServerError::BadRequest(format!("invalid email {raw:?}")))
    }
}

#[derive(Debug, Clone)]
pub struct MagicLinks {
    ttl_secs: i64,
}

impl Default for MagicLinks {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_LINK_TTL_SECS)
    }
}

impl MagicLinks {
    pub fn with_ttl(ttl_secs: i64) -> Self {
        Self { ttl_secs }
    }

    /// Store a fresh link for `email`, creating the user on first request.
    /// Only the token hash reaches the database.
    pub fn issue(&self, conn: &Connection, email: &str, now: i64) -> Result<IssuedMagicLink, ServerError> {
        let email = normalize_email(email)?;
        let user_id = get_or_create_user(conn, &email, now)?;

        let token = generate_token_default();
        let expires_at = now + self.ttl_secs;
        insert_magic_link(conn, user_id, &hash_token(&token), now, expires_at)?;

        Ok(IssuedMagicLink {
            link: format!("{REDEEM_PATH}?token={token}"),
            email,
            user_id,
            token,
            expires_at,
        })
    }

    /// Spend a token. A blank token is a BadRequest; unknown, expired or
    /// reused tokens are Unauthorized.
    pub fn redeem(&self, conn: &Connection, token: &str, now: i64) -> Result<RedeemedMagicLink, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }

        let user_id = consume_magic_link(conn, &hash_token(token), now)?
            .ok_or_else(|| ServerError::Unauthorized("invalid or expired link".into()))?;
        Ok(RedeemedMagicLink {
            user_id,
            email: get_user_email(conn, user_id)?,
        })
    }
}
