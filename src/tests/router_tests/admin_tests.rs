use crate::db::listings::{get_listing, get_listing_draft};
use crate::domain::listing::{ListingStatus, NumericOrDisplay};
use crate::errors::ServerError;
use crate::router::{handle, respond};
use crate::storage::ObjectStore;
use crate::templates::pages::admin_form::values_from_draft;
use crate::tests::utils::{
    body_string, get, init_test_app, location, post_form, seed_listing, sign_in, ADMIN_EMAIL,
};

#[test]
fn anonymous_visitor_is_sent_to_login() {
    let (_dir, app) = init_test_app();

    assert!(matches!(
        handle(get("/admin", None), &app),
        Err(ServerError::Unauthorized(_))
    ));
    let resp = respond(get("/admin", None), &app);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn signed_in_visitor_is_forbidden() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, "visita@example.com");

    let resp = respond(get("/admin", Some(&token)), &app);
    assert_eq!(resp.status(), 403);
    assert!(body_string(resp).contains("Acesso restrito"));

    let resp = respond(post_form("/admin/imoveis", "title=x", Some(&token)), &app);
    assert_eq!(resp.status(), 403);
}

#[test]
fn admin_panel_lists_every_listing() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    seed_listing(&app, &[("title", "Casa Vendida"), ("status", "vendido")]);
    seed_listing(&app, &[("title", "Apartamento Novo")]);

    let resp = handle(get("/admin", Some(&token)), &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Painel Administrativo"));
    assert!(body.contains(ADMIN_EMAIL));
    assert!(body.contains("Casa Vendida"));
    assert!(body.contains("Apartamento Novo"));
    assert!(body.contains("Admin"), "nav shows the admin link");
}

#[test]
fn admin_creates_listing_and_lands_on_images() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);

    let form = "title=Cobertura+Vista+Mar&type=cobertura&location=Santos&status=disponivel\
&price=2.500.000&bedrooms=4&bathrooms=3&parking=3&area=&area_display=Sob+consulta&is_featured=on";
    let resp = handle(post_form("/admin/imoveis", form, Some(&token)), &app).unwrap();
    assert_eq!(resp.status(), 302);

    let target = location(&resp).to_string();
    let id = target
        .strip_prefix("/admin/imoveis/")
        .and_then(|rest| rest.strip_suffix("/imagens"))
        .expect("redirects to the image manager")
        .to_string();

    let listing = app
        .db
        .with_conn(|conn| get_listing(conn, &id))
        .unwrap()
        .unwrap();
    assert_eq!(listing.title, "Cobertura Vista Mar");
    assert_eq!(listing.price, NumericOrDisplay::Exact(2_500_000.0));
    assert_eq!(listing.area, NumericOrDisplay::Override("Sob consulta".into()));
    assert!(listing.is_featured);
    assert!(listing.images.is_empty());

    let body = body_string(handle(get(&target, Some(&token)), &app).unwrap());
    assert!(body.contains("Nenhuma imagem adicionada"));
}

#[test]
fn invalid_listing_form_is_returned_with_errors() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);

    let resp = handle(
        post_form("/admin/imoveis", "title=Ok&type=casa&location=Rio&price=-1", Some(&token)),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);

    let body = body_string(resp);
    assert!(body.contains("Título deve ter no mínimo 3 caracteres"));
    assert!(body.contains("Preço deve ser positivo"));
    assert!(body.contains("value=\"Rio\""), "typed values come back");
}

#[test]
fn admin_edits_listing() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);

    let body = body_string(
        handle(get(&format!("/admin/imoveis/{id}/editar"), Some(&token)), &app).unwrap(),
    );
    assert!(body.contains("value=\"Apartamento Jardins\""));
    assert!(body.contains("value=\"850000\""));

    let form = "title=Apartamento+Reformado&type=apartamento&location=S%C3%A3o+Paulo\
&status=alugado&price=900000&bedrooms=3&bathrooms=2&parking=1&area=120";
    let resp = handle(
        post_form(&format!("/admin/imoveis/{id}"), form, Some(&token)),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin");

    let listing = app
        .db
        .with_conn(|conn| get_listing(conn, &id))
        .unwrap()
        .unwrap();
    assert_eq!(listing.title, "Apartamento Reformado");
    assert_eq!(listing.status, ListingStatus::Rented);
    assert_eq!(listing.parking, NumericOrDisplay::Exact(1));
}

#[test]
fn saving_edit_form_untouched_keeps_overridden_numbers() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(
        &app,
        &[
            ("price", "500000"),
            ("price_display", "Sob consulta"),
            ("bedrooms", "3"),
            ("bedrooms_display", "3 ou 4"),
        ],
    );

    let body = body_string(
        handle(get(&format!("/admin/imoveis/{id}/editar"), Some(&token)), &app).unwrap(),
    );
    assert!(body.contains("name=\"price\" value=\"500000\""));
    assert!(body.contains("name=\"bedrooms\" value=\"3\""));
    assert!(body.contains("value=\"Sob consulta\""));

    // Post back exactly what the form was filled with.
    let draft = app
        .db
        .with_conn(|conn| get_listing_draft(conn, &id))
        .unwrap()
        .unwrap();
    let mut values: Vec<(String, String)> = values_from_draft(&draft).into_iter().collect();
    values.sort();
    let form: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&values)
        .finish();
    let resp = handle(
        post_form(&format!("/admin/imoveis/{id}"), &form, Some(&token)),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    let stored: (f64, u32) = app
        .db
        .with_conn(|conn| {
            Ok(conn.query_row(
                "select price, bedrooms from properties where id = ?",
                [&id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?)
        })
        .unwrap();
    assert_eq!(stored, (500000.0, 3));

    // Clearing the override shows the stored number again.
    let form = form.replace("price_display=Sob+consulta", "price_display=");
    handle(
        post_form(&format!("/admin/imoveis/{id}"), &form, Some(&token)),
        &app,
    )
    .unwrap();
    let listing = app
        .db
        .with_conn(|conn| get_listing(conn, &id))
        .unwrap()
        .unwrap();
    assert_eq!(listing.price, NumericOrDisplay::Exact(500000.0));
    assert_eq!(listing.bedrooms, NumericOrDisplay::Override("3 ou 4".into()));
}

#[test]
fn editing_unknown_listing_is_404() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);

    let resp = respond(get("/admin/imoveis/NAOEXISTE/editar", Some(&token)), &app);
    assert_eq!(resp.status(), 404);
}

#[test]
fn deleting_listing_removes_rows_and_stored_files() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);
    let id = seed_listing(&app, &[]);

    let stored = app.store.put("sala.jpg", b"jpeg").unwrap();
    app.db
        .with_conn(|conn| {
            crate::db::images::insert_images(
                conn,
                &[crate::db::images::new_image(&id, &stored.url, Some(stored.key.clone()))],
                crate::app::now_naive(),
            )
        })
        .unwrap();

    let resp = handle(
        post_form(&format!("/admin/imoveis/{id}/excluir"), "", Some(&token)),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin");

    assert!(app
        .db
        .with_conn(|conn| get_listing(conn, &id))
        .unwrap()
        .is_none());
    assert_eq!(app.store.read(&stored.key).unwrap(), None);
}
