// src/handlers/auth.rs
use astra::Request;
use tracing::{info, warn};

use crate::app::{now_unix, App};
use crate::auth::sessions::{clear_session_cookie, revoke_session, session_cookie};
use crate::auth::SessionContext;
use crate::db::auth::{has_role, ROLE_ADMIN};
use crate::db::magic_auth::{redeem_magic_link, request_magic_link};
use crate::errors::{ResultResp, ServerError};
use crate::forms::{parse_form, parse_query};
use crate::responses::{html_response, html_response_with_status, redirect_with_cookie};
use crate::templates::components::{notice, NoticeKind};
use crate::templates::pages::{check_email_content, check_email_page, login_page};

fn is_htmx(req: &Request) -> bool {
    req.headers().contains_key("HX-Request")
}

pub fn login(ctx: &SessionContext) -> ResultResp {
    html_response(login_page(ctx))
}

/// Issue a link and mail it. Without a mail key the link is only logged.
pub fn request_link(app: &App, ctx: &SessionContext, req: &mut Request) -> ResultResp {
    let htmx = is_htmx(req);
    let form = parse_form(req)?;
    let email = form.get("email").map(String::as_str).unwrap_or("");

    let issued = match request_magic_link(&app.db, email, now_unix()) {
        Ok(issued) => issued,
        Err(ServerError::BadRequest(_)) if htmx => {
            return html_response_with_status(
                400,
                notice(NoticeKind::Error, "Informe um e-mail válido."),
            );
        }
        Err(e) => return Err(e),
    };

    let link = format!("{}{}", app.config.public_base_url, issued.link);
    match &app.mailer {
        Some(mailer) => {
            mailer.send_magic_link(&issued.email, &link).map_err(|e| {
                warn!(email = %issued.email, error = %e, "magic link mail failed");
                e
            })?;
            info!(email = %issued.email, "magic link sent");
        }
        None => info!(email = %issued.email, %link, "mail disabled; magic link issued"),
    }

    if htmx {
        html_response(check_email_content(&issued.email))
    } else {
        html_response(check_email_page(ctx, &issued.email))
    }
}

pub fn redeem(app: &App, req: &Request) -> ResultResp {
    let query = parse_query(req);
    let token = query.get("token").map(String::as_str).unwrap_or("");
    let now = now_unix();

    let signed_in = redeem_magic_link(&app.db, &app.config, token, now).map_err(|e| match e {
        ServerError::Unauthorized(_) => {
            ServerError::BadRequest("Link inválido ou expirado. Solicite um novo acesso.".into())
        }
        other => other,
    })?;

    let is_admin = app
        .db
        .with_conn(|conn| has_role(conn, signed_in.user_id, ROLE_ADMIN))?;
    info!(email = %signed_in.email, is_admin, "signed in");

    let target = if is_admin { "/admin" } else { "/" };
    redirect_with_cookie(target, &session_cookie(&signed_in.session_token))
}

pub fn logout(app: &App, ctx: &SessionContext) -> ResultResp {
    if let Some(token) = ctx.token() {
        app.db
            .with_conn(|conn| revoke_session(conn, token, now_unix()))?;
    }
    redirect_with_cookie("/", &clear_session_cookie())
}
