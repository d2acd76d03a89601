use crate::app::{now_unix, App};
use crate::auth::SessionContext;
use crate::errors::{ResultResp, ServerError};
use crate::handlers::{admin, auth, public};
use crate::responses::error_to_response;
use astra::{Request, Response};
use std::time::Instant;
use tracing::{error, info, warn};

/// Route one request. Static files and uploads skip the session lookup;
/// everything else gets a resolved `SessionContext`.
pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["static", name]) => return public::static_asset(name),
        ("GET", ["uploads", key]) => return public::upload(app, key),
        _ => {}
    }

    let mut ctx = SessionContext::from_request(&req);
    app.db
        .with_conn(|conn| ctx.resolve(conn, now_unix()).map(|_| ()))?;

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => public::home(app, &ctx),
        ("GET", ["imoveis"]) => public::catalog(app, &ctx, &req),
        ("GET", ["imoveis", id]) => public::detail(app, &ctx, id),
        ("POST", ["contato"]) => public::contact(app, &ctx, &mut req),

        ("GET", ["login"]) => auth::login(&ctx),
        ("POST", ["auth", "request-link"]) => auth::request_link(app, &ctx, &mut req),
        ("GET", ["auth", "magic"]) => auth::redeem(app, &req),
        ("POST", ["logout"]) => auth::logout(app, &ctx),

        (method, ["admin", rest @ ..]) => {
            ctx.require_admin()?;
            admin::route(method, rest, &mut req, app, &ctx)
        }

        _ => Err(ServerError::NotFound),
    }
}

/// `handle` plus the request log line and error pages.
pub fn respond(req: Request, app: &App) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => {
            let status = err.status();
            if status >= 500 {
                error!(%method, %path, error = %err, "request failed");
            } else if !matches!(err, ServerError::NotFound | ServerError::Unauthorized(_)) {
                warn!(%method, %path, error = %err, "request rejected");
            }
            error_to_response(err)
        }
    };

    info!(
        %method,
        %path,
        status = resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    resp
}
