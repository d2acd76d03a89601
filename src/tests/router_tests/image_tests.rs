use crate::app::App;
use crate::db::images::list_images;
use crate::errors::ServerError;
use crate::router::{handle, respond};
use crate::storage::ObjectStore;
use crate::tests::utils::{
    body_string, cookie, get, init_test_app, location, post_form, seed_images, seed_listing,
    sign_in, ADMIN_EMAIL,
};
use astra::Body;
use http::{Method, Request};

fn persisted(app: &App, listing_id: &str) -> Vec<(String, bool, Option<i64>)> {
    app.db
        .with_conn(|conn| list_images(conn, listing_id))
        .unwrap()
        .into_iter()
        .map(|img| (img.id, img.is_primary, img.display_order))
        .collect()
}

fn ids(app: &App, listing_id: &str) -> Vec<String> {
    persisted(app, listing_id).into_iter().map(|(id, _, _)| id).collect()
}

/// Makes every image-order write fail, as a full disk would.
fn break_order_writes(app: &App) {
    app.db
        .with_conn(|conn| {
            conn.execute_batch(
                "create trigger fail_order before update on property_images
                 begin select raise(abort, 'disk full'); end;",
            )
            .map_err(ServerError::from)
        })
        .unwrap();
}

#[test]
fn image_urls_are_appended_in_order() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    let seeded = seed_images(&app, &id, 1);

    let form = "urls=https%3A%2F%2Fcdn.example.com%2Fa.jpg%0D%0A%0D%0A%2Fuploads%2Fb.png";
    let resp = handle(
        post_form(&format!("/admin/imoveis/{id}/imagens"), form, Some(&token)),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), format!("/admin/imoveis/{id}/imagens"));

    let rows = persisted(&app, &id);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].0, seeded[0].id);
    assert_eq!(
        rows.iter().map(|(_, p, o)| (*p, *o)).collect::<Vec<_>>(),
        vec![(true, Some(0)), (false, Some(1)), (false, Some(2))]
    );

    let images = app.db.with_conn(|conn| list_images(conn, &id)).unwrap();
    assert_eq!(images[1].url, "https://cdn.example.com/a.jpg");
    assert_eq!(images[2].url, "/uploads/b.png");
}

#[test]
fn invalid_image_url_is_rejected() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);

    let resp = respond(
        post_form(
            &format!("/admin/imoveis/{id}/imagens"),
            "urls=javascript%3Aalert(1)",
            Some(&token),
        ),
        &app,
    );
    assert_eq!(resp.status(), 400);
    assert!(persisted(&app, &id).is_empty());
}

#[test]
fn first_url_on_empty_listing_becomes_cover() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);

    handle(
        post_form(
            &format!("/admin/imoveis/{id}/imagens"),
            "urls=https%3A%2F%2Fx.com%2F1.jpg%0Ahttps%3A%2F%2Fx.com%2F2.jpg",
            Some(&token),
        ),
        &app,
    )
    .unwrap();

    let flags: Vec<bool> = persisted(&app, &id).into_iter().map(|(_, p, _)| p).collect();
    assert_eq!(flags, vec![true, false]);
}

#[test]
fn move_down_swaps_neighbours_and_moves_cover() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    let seeded = seed_images(&app, &id, 3);

    let resp = handle(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/mover"),
            "index=0&direction=down",
            Some(&token),
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    let rows = persisted(&app, &id);
    assert_eq!(
        rows,
        vec![
            (seeded[1].id.clone(), true, Some(0)),
            (seeded[0].id.clone(), false, Some(1)),
            (seeded[2].id.clone(), false, Some(2)),
        ]
    );
}

#[test]
fn move_past_the_edge_changes_nothing() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    seed_images(&app, &id, 2);
    let before = persisted(&app, &id);

    let resp = handle(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/mover"),
            "index=0&direction=up",
            Some(&token),
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(persisted(&app, &id), before);
}

#[test]
fn bad_direction_is_a_bad_request() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    seed_images(&app, &id, 2);

    let resp = respond(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/mover"),
            "index=0&direction=sideways",
            Some(&token),
        ),
        &app,
    );
    assert_eq!(resp.status(), 400);
}

#[test]
fn promote_moves_image_to_front() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    let seeded = seed_images(&app, &id, 3);

    let resp = handle(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/{}/capa", seeded[2].id),
            "",
            Some(&token),
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    assert_eq!(
        ids(&app, &id),
        vec![
            seeded[2].id.clone(),
            seeded[0].id.clone(),
            seeded[1].id.clone()
        ]
    );
    assert!(persisted(&app, &id)[0].1);
}

#[test]
fn remove_renumbers_the_rest() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    let seeded = seed_images(&app, &id, 3);

    let resp = handle(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/{}/remover", seeded[0].id),
            "",
            Some(&token),
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    assert_eq!(
        persisted(&app, &id),
        vec![
            (seeded[1].id.clone(), true, Some(0)),
            (seeded[2].id.clone(), false, Some(1)),
        ]
    );
}

#[test]
fn removing_unknown_image_is_404() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    seed_images(&app, &id, 1);

    let resp = respond(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/naoexiste/remover"),
            "",
            Some(&token),
        ),
        &app,
    );
    assert_eq!(resp.status(), 404);
    assert_eq!(persisted(&app, &id).len(), 1);
}

#[test]
fn failed_reorder_keeps_persisted_order_and_offers_retry() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    let seeded = seed_images(&app, &id, 3);
    let before = persisted(&app, &id);
    break_order_writes(&app);

    let resp = handle(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/mover"),
            "index=1&direction=up",
            Some(&token),
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 503);

    let body = body_string(resp);
    assert!(body.contains("Não foi possível salvar a nova ordem"));
    assert!(body.contains("Tentar novamente"));
    assert!(body.contains(r#"name="direction" value="up""#));
    // The grid shows the order that is still stored: first seeded image first.
    let first = body.find(&seeded[0].id).unwrap();
    let second = body.find(&seeded[1].id).unwrap();
    assert!(first < second);

    assert_eq!(persisted(&app, &id), before);
}

#[test]
fn failed_remove_rolls_back_the_delete() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    let seeded = seed_images(&app, &id, 3);
    let before = persisted(&app, &id);
    break_order_writes(&app);

    let resp = handle(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/{}/remover", seeded[0].id),
            "",
            Some(&token),
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 503);
    assert!(body_string(resp).contains(&format!(
        "/admin/imoveis/{id}/imagens/{}/remover",
        seeded[0].id
    )));
    assert_eq!(persisted(&app, &id), before);
}

#[test]
fn multipart_upload_is_stored_and_served() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);

    let body = b"--XyZ\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"fachada.png\"\r\n\
Content-Type: image/png\r\n\r\n\
PNGDATA\r\n\
--XyZ--\r\n"
        .to_vec();
    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/admin/imoveis/{id}/imagens/upload"))
        .header("Cookie", cookie(&token))
        .header("Content-Type", "multipart/form-data; boundary=XyZ")
        .body(Body::from(body))
        .unwrap();

    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 302);

    let images = app.db.with_conn(|conn| list_images(conn, &id)).unwrap();
    assert_eq!(images.len(), 1);
    assert!(images[0].is_primary);
    let key = images[0].storage_key.clone().expect("uploaded images keep their key");
    assert_eq!(images[0].url, format!("/uploads/{key}"));

    // Served back without a session.
    let resp = handle(get(&images[0].url, None), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["Content-Type"], "image/png");
    assert_eq!(body_string(resp), "PNGDATA");

    // Removing the image drops the stored file too.
    handle(
        post_form(
            &format!("/admin/imoveis/{id}/imagens/{}/remover", images[0].id),
            "",
            Some(&token),
        ),
        &app,
    )
    .unwrap();
    assert_eq!(app.store.read(&key).unwrap(), None);
}

#[test]
fn raw_upload_uses_filename_query() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);
    seed_images(&app, &id, 1);

    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/admin/imoveis/{id}/imagens/upload?filename=quarto.jpg"))
        .header("Cookie", cookie(&token))
        .header("Content-Type", "image/jpeg")
        .body(Body::from(b"JPEG".to_vec()))
        .unwrap();
    assert_eq!(handle(req, &app).unwrap().status(), 302);

    let rows = persisted(&app, &id);
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[1].1, rows[1].2), (false, Some(1)));
}

#[test]
fn unsupported_upload_is_rejected() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);

    let req = Request::builder()
        .method(Method::POST)
        .uri(format!("/admin/imoveis/{id}/imagens/upload?filename=planta.pdf"))
        .header("Cookie", cookie(&token))
        .body(Body::from(b"%PDF".to_vec()))
        .unwrap();
    assert_eq!(respond(req, &app).status(), 400);
    assert!(persisted(&app, &id).is_empty());
}

#[test]
fn missing_upload_is_404() {
    let (_dir, app) = init_test_app();
    assert_eq!(respond(get("/uploads/naoexiste.jpg", None), &app).status(), 404);
    assert_eq!(respond(get("/uploads/..", None), &app).status(), 400);
}
