// src/auth/context.rs
use astra::Request;
use rusqlite::Connection;

use crate::auth::sessions::{load_user_from_session, session_token_from_cookie_header};
use crate::db::auth::{has_role, ROLE_ADMIN};
use crate::errors::ServerError;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub user_id: i64,
    pub email: String,
    pub is_admin: bool,
}

/// Where a request stands on sign-in. `Unresolved` until the session cookie
/// has been checked against the database.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unresolved,
    Anonymous,
    Authenticated(SessionUser),
}

/// Per-request auth context, handed explicitly to handlers and templates.
#[derive(Debug, Clone)]
pub struct SessionContext {
    token: Option<String>,
    state: AuthState,
}

impl SessionContext {
    pub fn from_request(req: &Request) -> Self {
        let token = req
            .headers()
            .get_all("Cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(session_token_from_cookie_header);
        Self::from_token(token)
    }

    pub fn from_token(token: Option<String>) -> Self {
        Self {
            token,
            state: AuthState::Unresolved,
        }
    }

    /// Already resolved as signed out. Used by pages rendered without a lookup.
    pub fn anonymous() -> Self {
        Self {
            token: None,
            state: AuthState::Anonymous,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Check the cookie. Unknown, expired or revoked sessions resolve to
    /// `Anonymous`; only database failures are errors.
    pub fn resolve(&mut self, conn: &Connection, now: i64) -> Result<&AuthState, ServerError> {
        let Some(token) = self.token.as_deref() else {
            self.state = AuthState::Anonymous;
            return Ok(&self.state);
        };

        self.state = match load_user_from_session(conn, token, now)? {
            Some((user_id, email)) => AuthState::Authenticated(SessionUser {
                user_id,
                is_admin: has_role(conn, user_id, ROLE_ADMIN)?,
                email,
            }),
            None => AuthState::Anonymous,
        };
        Ok(&self.state)
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.is_admin)
    }

    pub fn require_admin(&self) -> Result<&SessionUser, ServerError> {
        match &self.state {
            AuthState::Authenticated(user) if user.is_admin => Ok(user),
            AuthState::Authenticated(user) => Err(ServerError::Forbidden(format!(
                "{} is not an administrator",
                user.email
            ))),
            AuthState::Anonymous => Err(ServerError::Unauthorized("sign in required".into())),
            AuthState::Unresolved => {
                tracing::error!("require_admin called before the session was resolved");
                Err(ServerError::InternalError)
            }
        }
    }
}
