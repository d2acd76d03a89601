// src/handlers/admin.rs
use astra::Request;
use tracing::{error, info, warn};

use crate::app::{now_naive, App};
use crate::auth::SessionContext;
use crate::db::images::{delete_image_and_reorder, insert_images, list_images, new_image, update_image_order};
use crate::db::listings::{
    delete_listing, fetch_listings, get_listing, get_listing_draft, insert_listing, update_listing,
    ListingQuery,
};
use crate::domain::listing::{Listing, ListingDraft, ListingImage};
use crate::domain::sequencing::{append_new, move_adjacent, promote_to_first, remove_image, Direction};
use crate::errors::{ResultResp, ServerError};
use crate::forms::{first_file_part, parse_form, parse_query, read_upload};
use crate::responses::{html_response, html_response_with_status, redirect};
use crate::storage::ObjectStore;
use crate::templates::components::{NoticeKind, RetryAction};
use crate::templates::pages::{
    admin_images_page, admin_page, listing_form_page, values_from_draft, FormValues,
    ImageManagerVm, ListingFormVm,
};

const ORDER_NOT_SAVED: &str =
    "Não foi possível salvar a nova ordem. As imagens abaixo estão na ordem que continua salva.";

fn images_url(listing_id: &str) -> String {
    format!("/admin/imoveis/{listing_id}/imagens")
}

fn load_listing(app: &App, id: &str) -> Result<Listing, ServerError> {
    app.db
        .with_conn(|conn| get_listing(conn, id))?
        .ok_or(ServerError::NotFound)
}

/// Everything under `/admin`. The caller has already checked the admin role.
pub fn route(
    method: &str,
    segments: &[&str],
    req: &mut Request,
    app: &App,
    ctx: &SessionContext,
) -> ResultResp {
    match (method, segments) {
        ("GET", []) => list(app, ctx),
        ("GET", ["imoveis", "novo"]) => new_form(ctx),
        ("POST", ["imoveis"]) => create(app, ctx, req),
        ("GET", ["imoveis", id, "editar"]) => edit_form(app, ctx, id),
        ("POST", ["imoveis", id]) => update(app, ctx, req, id),
        ("POST", ["imoveis", id, "excluir"]) => delete(app, id),
        ("GET", ["imoveis", id, "imagens"]) => images_page(app, ctx, id),
        ("POST", ["imoveis", id, "imagens"]) => add_urls(app, req, id),
        ("POST", ["imoveis", id, "imagens", "upload"]) => upload(app, req, id),
        ("POST", ["imoveis", id, "imagens", "mover"]) => move_image(app, ctx, req, id),
        ("POST", ["imoveis", id, "imagens", image_id, "capa"]) => {
            promote(app, ctx, id, image_id)
        }
        ("POST", ["imoveis", id, "imagens", image_id, "remover"]) => {
            remove(app, ctx, id, image_id)
        }
        _ => Err(ServerError::NotFound),
    }
}

fn list(app: &App, ctx: &SessionContext) -> ResultResp {
    let listings = app
        .db
        .with_conn(|conn| fetch_listings(conn, &ListingQuery::all()))?;
    html_response(admin_page(ctx, &listings))
}

fn new_form(ctx: &SessionContext) -> ResultResp {
    let values = FormValues::new();
    html_response(listing_form_page(
        ctx,
        &ListingFormVm {
            listing_id: None,
            values: &values,
            errors: &[],
        },
    ))
}

fn create(app: &App, ctx: &SessionContext, req: &mut Request) -> ResultResp {
    let form = parse_form(req)?;
    match ListingDraft::from_form(&form) {
        Ok(draft) => {
            let id = app
                .db
                .with_conn(|conn| insert_listing(conn, &draft, now_naive()))?;
            info!(listing = %id, "listing created");
            redirect(&images_url(&id))
        }
        Err(errors) => html_response_with_status(
            400,
            listing_form_page(
                ctx,
                &ListingFormVm {
                    listing_id: None,
                    values: &form,
                    errors: &errors,
                },
            ),
        ),
    }
}

fn edit_form(app: &App, ctx: &SessionContext, id: &str) -> ResultResp {
    let draft = app
        .db
        .with_conn(|conn| get_listing_draft(conn, id))?
        .ok_or(ServerError::NotFound)?;
    let values = values_from_draft(&draft);
    html_response(listing_form_page(
        ctx,
        &ListingFormVm {
            listing_id: Some(id),
            values: &values,
            errors: &[],
        },
    ))
}

fn update(app: &App, ctx: &SessionContext, req: &mut Request, id: &str) -> ResultResp {
    let form = parse_form(req)?;
    match ListingDraft::from_form(&form) {
        Ok(draft) => {
            app.db.with_conn(|conn| update_listing(conn, id, &draft))?;
            info!(listing = %id, "listing updated");
            redirect("/admin")
        }
        Err(errors) => html_response_with_status(
            400,
            listing_form_page(
                ctx,
                &ListingFormVm {
                    listing_id: Some(id),
                    values: &form,
                    errors: &errors,
                },
            ),
        ),
    }
}

/// Stored files are removed after the rows; a leftover file is only logged.
fn drop_stored(app: &App, images: &[ListingImage]) {
    for key in images.iter().filter_map(|img| img.storage_key.as_deref()) {
        if let Err(e) = app.store.delete(key) {
            warn!(key, error = %e, "stored image not deleted");
        }
    }
}

fn delete(app: &App, id: &str) -> ResultResp {
    let images = app.db.with_conn(|conn| delete_listing(conn, id))?;
    drop_stored(app, &images);
    info!(listing = %id, images = images.len(), "listing deleted");
    redirect("/admin")
}

fn images_page(app: &App, ctx: &SessionContext, id: &str) -> ResultResp {
    let listing = load_listing(app, id)?;
    html_response(admin_images_page(
        ctx,
        &ImageManagerVm {
            listing: &listing,
            images: &listing.images,
            notice: None,
            retry: None,
        },
    ))
}

fn is_image_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/')
}

/// Append new images after the current last one and store only the new rows.
fn append_images(app: &App, listing_id: &str, fresh: Vec<ListingImage>) -> Result<(), ServerError> {
    app.db.with_conn(|conn| {
        let current = list_images(conn, listing_id)?;
        let start = current.len();
        let combined = append_new(current, fresh);
        insert_images(conn, &combined[start..], now_naive())
    })
}

fn add_urls(app: &App, req: &mut Request, id: &str) -> ResultResp {
    load_listing(app, id)?;
    let form = parse_form(req)?;
    let urls: Vec<&str> = form
        .get("urls")
        .map(|raw| raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
        .unwrap_or_default();

    if urls.is_empty() {
        return Err(ServerError::BadRequest("Informe ao menos uma URL".into()));
    }
    if let Some(bad) = urls.iter().find(|u| !is_image_url(u)) {
        return Err(ServerError::BadRequest(format!("URL inválida: {bad}")));
    }

    let fresh = urls.iter().map(|url| new_image(id, url, None)).collect();
    append_images(app, id, fresh)?;
    info!(listing = %id, count = urls.len(), "image urls added");
    redirect(&images_url(id))
}

/// Accepts the browser's multipart form or a raw body with `?filename=`.
fn upload(app: &App, req: &mut Request, id: &str) -> ResultResp {
    load_listing(app, id)?;
    let content_type = req
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let query = parse_query(req);
    let body = read_upload(req)?;

    let (filename, bytes) = if content_type.starts_with("multipart/form-data") {
        let file = first_file_part(&content_type, &body)
            .ok_or_else(|| ServerError::BadRequest("Nenhum arquivo enviado".into()))?;
        (file.filename, file.bytes)
    } else {
        let filename = query
            .get("filename")
            .cloned()
            .ok_or_else(|| ServerError::BadRequest("missing filename".into()))?;
        (filename, body)
    };

    let stored = app.store.put(&filename, &bytes)?;
    let image = new_image(id, &stored.url, Some(stored.key.clone()));
    if let Err(e) = append_images(app, id, vec![image]) {
        if let Err(cleanup) = app.store.delete(&stored.key) {
            warn!(key = %stored.key, error = %cleanup, "orphaned upload");
        }
        return Err(e);
    }
    info!(listing = %id, key = %stored.key, size = bytes.len(), "image uploaded");
    redirect(&images_url(id))
}

/// 503 with the order that is still persisted and a retry button.
fn order_not_saved(
    app: &App,
    ctx: &SessionContext,
    listing: &Listing,
    err: ServerError,
    retry: RetryAction,
) -> ResultResp {
    error!(listing = %listing.id, error = %err, "image order not saved");
    let persisted = app
        .db
        .with_conn(|conn| list_images(conn, &listing.id))
        .unwrap_or_else(|_| listing.images.clone());

    html_response_with_status(
        503,
        admin_images_page(
            ctx,
            &ImageManagerVm {
                listing,
                images: &persisted,
                notice: Some((NoticeKind::Error, ORDER_NOT_SAVED.to_string())),
                retry: Some(retry),
            },
        ),
    )
}

/// Apply an in-memory reordering and persist it. The new order only counts
/// once the write succeeds.
fn reorder(
    app: &App,
    ctx: &SessionContext,
    listing_id: &str,
    op: impl FnOnce(Vec<ListingImage>) -> Vec<ListingImage>,
    retry: RetryAction,
) -> ResultResp {
    let listing = load_listing(app, listing_id)?;
    let reordered = op(listing.images.clone());
    if reordered == listing.images {
        return redirect(&images_url(listing_id));
    }

    match app.db.with_conn(|conn| update_image_order(conn, &reordered)) {
        Ok(()) => redirect(&images_url(listing_id)),
        Err(e) => order_not_saved(app, ctx, &listing, e, retry),
    }
}

fn move_image(app: &App, ctx: &SessionContext, req: &mut Request, id: &str) -> ResultResp {
    let form = parse_form(req)?;
    let index: usize = form
        .get("index")
        .and_then(|i| i.trim().parse().ok())
        .ok_or_else(|| ServerError::BadRequest("invalid index".into()))?;
    let direction: Direction = form
        .get("direction")
        .map(String::as_str)
        .unwrap_or("")
        .parse()?;

    reorder(
        app,
        ctx,
        id,
        |images| move_adjacent(images, index, direction),
        RetryAction::Move { index, direction },
    )
}

fn promote(app: &App, ctx: &SessionContext, id: &str, image_id: &str) -> ResultResp {
    reorder(
        app,
        ctx,
        id,
        |images| promote_to_first(images, image_id),
        RetryAction::Promote {
            image_id: image_id.to_string(),
        },
    )
}

fn remove(app: &App, ctx: &SessionContext, id: &str, image_id: &str) -> ResultResp {
    let listing = load_listing(app, id)?;
    let (remaining, removed) = remove_image(listing.images.clone(), image_id);
    let Some(removed) = removed else {
        return Err(ServerError::NotFound);
    };

    match app
        .db
        .with_conn(|conn| delete_image_and_reorder(conn, id, image_id, &remaining))
    {
        Ok(false) => Err(ServerError::NotFound),
        Ok(true) => {
            drop_stored(app, std::slice::from_ref(&removed));
            info!(listing = %id, image = %image_id, "image removed");
            redirect(&images_url(id))
        }
        Err(e) => order_not_saved(
            app,
            ctx,
            &listing,
            e,
            RetryAction::Remove {
                image_id: image_id.to_string(),
            },
        ),
    }
}
