// src/db/auth.rs
//! Users, roles and magic-link rows. Timestamps are unix seconds.
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

/// Role that opens `/admin`.
pub const ROLE_ADMIN: &str = "admin";

/// Id of the user with this (already normalized) email, created on first sight.
pub fn get_or_create_user(conn: &Connection, email: &str, now: i64) -> Result<i64, ServerError> {
    conn.execute(
        "insert into users (email, created_at) values (?1, ?2) on conflict(email) do nothing",
        params![email, now],
    )?;
    let id = conn.query_row(
        "select id from users where email = ?1",
        params![email],
        |r| r.get(0),
    )?;
    Ok(id)
}

pub fn get_user_email(conn: &Connection, user_id: i64) -> Result<String, ServerError> {
    conn.query_row(
        "select email from users where id = ?1",
        params![user_id],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| ServerError::DbError(format!("user {user_id} has no row")))
}

pub fn touch_last_login(conn: &Connection, user_id: i64, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "update users set last_login_at = ?1 where id = ?2",
        params![now, user_id],
    )?;
    Ok(())
}

/// Granting a role the user already has is a no-op.
pub fn grant_role(conn: &Connection, user_id: i64, role: &str, now: i64) -> Result<(), ServerError> {
    conn.execute(
        "insert into user_roles (user_id, role, granted_at) values (?1, ?2, ?3)
         on conflict(user_id, role) do nothing",
        params![user_id, role, now],
    )?;
    Ok(())
}

pub fn has_role(conn: &Connection, user_id: i64, role: &str) -> Result<bool, ServerError> {
    let n: i64 = conn.query_row(
        "select count(*) from user_roles where user_id = ?1 and role = ?2",
        params![user_id, role],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}

pub fn insert_magic_link(
    conn: &Connection,
    user_id: i64,
    token_hash: &[u8],
    created_at: i64,
    expires_at: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into magic_links (user_id, token_hash, created_at, expires_at) values (?1, ?2, ?3, ?4)",
        params![user_id, token_hash, created_at, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("insert magic link failed: {e}")))?;
    Ok(())
}

/// Mark a live link as used and return its user. Unknown, expired and
/// already-used links give `None`. The check and the write are one
/// statement, so two concurrent redemptions cannot both succeed.
pub fn consume_magic_link(
    conn: &Connection,
    token_hash: &[u8],
    now: i64,
) -> Result<Option<i64>, ServerError> {
    let user_id = conn
        .query_row(
            "update magic_links set used_at = ?1
             where token_hash = ?2 and used_at is null and expires_at > ?1
             returning user_id",
            params![now, token_hash],
            |r| r.get(0),
        )
        .optional()?;
    Ok(user_id)
}
