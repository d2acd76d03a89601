// src/handlers/public.rs
use astra::Request;
use tracing::warn;

use crate::app::{now_naive, App};
use crate::auth::SessionContext;
use crate::db::contact::{insert_contact_message, ContactMessage};
use crate::db::listings::{fetch_listings, get_listing, ListingQuery};
use crate::domain::filter::{bounds, filter, FilterCriteria};
use crate::errors::{ResultResp, ServerError};
use crate::forms::{parse_form, parse_query};
use crate::responses::{bytes_response, html_response, html_response_with_status};
use crate::storage::{content_type_for, ObjectStore};
use crate::templates::components::{contact_section, NoticeKind};
use crate::templates::desktop_layout;
use crate::templates::pages::{home_page, properties_page, property_detail_page, CatalogVm};

const FEATURED_LIMIT: usize = 6;
const RECENT_FALLBACK: usize = 3;

const MAIN_CSS: &str = include_str!("../../static/main.css");
const PLACEHOLDER_SVG: &str = include_str!("../../static/placeholder.svg");

pub fn home(app: &App, ctx: &SessionContext) -> ResultResp {
    let featured = app.db.with_conn(|conn| {
        let featured = fetch_listings(
            conn,
            &ListingQuery {
                only_available: true,
                featured_only: true,
                limit: Some(FEATURED_LIMIT),
            },
        )?;
        if !featured.is_empty() {
            return Ok(featured);
        }
        // Nothing flagged: show the newest available ones instead.
        fetch_listings(
            conn,
            &ListingQuery {
                limit: Some(RECENT_FALLBACK),
                ..ListingQuery::available()
            },
        )
    })?;

    html_response(home_page(ctx, &featured))
}

pub fn catalog(app: &App, ctx: &SessionContext, req: &Request) -> ResultResp {
    let listings = app
        .db
        .with_conn(|conn| fetch_listings(conn, &ListingQuery::all()))?;

    let bounds = bounds(&listings);
    let criteria = FilterCriteria::from_query(&parse_query(req), &bounds);
    let results = filter(&listings, &criteria);

    html_response(properties_page(
        ctx,
        &CatalogVm {
            criteria: &criteria,
            bounds: &bounds,
            results: &results,
            total: listings.len(),
        },
    ))
}

pub fn detail(app: &App, ctx: &SessionContext, id: &str) -> ResultResp {
    let listing = app
        .db
        .with_conn(|conn| get_listing(conn, id))?
        .ok_or(ServerError::NotFound)?;
    html_response(property_detail_page(ctx, &listing))
}

fn contact_page(ctx: &SessionContext, values: &ContactMessage, status: (NoticeKind, &str)) -> maud::Markup {
    desktop_layout(
        "Contato",
        ctx,
        maud::html! {
            main class="container" {
                (contact_section(values, Some(status)))
            }
        },
    )
}

/// Store the message first; the e-mail notification is best effort.
pub fn contact(app: &App, ctx: &SessionContext, req: &mut Request) -> ResultResp {
    let form = parse_form(req)?;

    let msg = match ContactMessage::from_form(&form) {
        Ok(msg) => msg,
        Err(ServerError::BadRequest(reason)) => {
            let field = |k: &str| form.get(k).cloned().unwrap_or_default();
            let typed = ContactMessage {
                name: field("name"),
                email: field("email"),
                phone: Some(field("phone")).filter(|p| !p.is_empty()),
                message: field("message"),
            };
            return html_response_with_status(
                400,
                contact_page(ctx, &typed, (NoticeKind::Error, &reason)),
            );
        }
        Err(other) => return Err(other),
    };

    let id = app
        .db
        .with_conn(|conn| insert_contact_message(conn, &msg, now_naive()))?;
    tracing::info!(id, "contact message stored");

    if let (Some(mailer), Some(inbox)) = (&app.mailer, &app.config.contact_inbox) {
        if let Err(e) = mailer.send_contact_notification(inbox, &msg) {
            warn!(id, error = %e, "contact notification not sent");
        }
    }

    html_response(contact_page(
        ctx,
        &ContactMessage::default(),
        (
            NoticeKind::Success,
            "Mensagem enviada! Entraremos em contato em breve.",
        ),
    ))
}

pub fn upload(app: &App, key: &str) -> ResultResp {
    let bytes = app.store.read(key)?.ok_or(ServerError::NotFound)?;
    bytes_response(bytes, &content_type_for(key), 86_400)
}

pub fn static_asset(name: &str) -> ResultResp {
    match name {
        "main.css" => bytes_response(MAIN_CSS.as_bytes().to_vec(), &mime::TEXT_CSS_UTF_8, 3600),
        "placeholder.svg" => {
            let svg: mime::Mime = "image/svg+xml"
                .parse()
                .map_err(|_| ServerError::InternalError)?;
            bytes_response(PLACEHOLDER_SVG.as_bytes().to_vec(), &svg, 86_400)
        }
        _ => Err(ServerError::NotFound),
    }
}
