use crate::app::now_unix;
use crate::auth::sessions::load_user_from_session;
use crate::db::magic_auth::request_magic_link;
use crate::errors::ServerError;
use crate::router::{handle, respond};
use crate::tests::utils::{
    body_string, get, init_test_app, location, post_form, sign_in, ADMIN_EMAIL,
};
use astra::Body;
use http::{Method, Request};

#[test]
fn login_page_loads_successfully() {
    let (_dir, app) = init_test_app();

    let resp = handle(get("/login", None), &app).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Receber link de acesso"));
    assert!(body.contains("form"));
}

#[test]
fn request_link_returns_partial_html_for_htmx() {
    let (_dir, app) = init_test_app();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/request-link")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("HX-Request", "true")
        .body(Body::from("email=Visitante%40Example.com"))
        .unwrap();

    let resp = handle(req, &app).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Verifique seu e-mail"));
    assert!(body.contains("visitante@example.com"));
    // A partial, swapped into the page by htmx.
    assert!(!body.contains("<!DOCTYPE html>"));
    assert!(!body.contains("<html"));

    let links: i64 = app
        .db
        .with_conn(|conn| {
            conn.query_row("select count(*) from magic_links", [], |r| r.get(0))
                .map_err(ServerError::from)
        })
        .unwrap();
    assert_eq!(links, 1);
}

#[test]
fn request_link_without_htmx_renders_full_page() {
    let (_dir, app) = init_test_app();

    let resp = handle(
        post_form("/auth/request-link", "email=a%40b.com", None),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("Verifique seu e-mail"));
}

#[test]
fn invalid_email_under_htmx_is_an_inline_error() {
    let (_dir, app) = init_test_app();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/request-link")
        .header("HX-Request", "true")
        .body(Body::from("email=sem-arroba"))
        .unwrap();

    let resp = handle(req, &app).unwrap();
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Informe um e-mail válido"));
}

#[test]
fn magic_link_signs_admin_in_and_redirects_to_panel() {
    let (_dir, app) = init_test_app();
    let issued = request_magic_link(&app.db, ADMIN_EMAIL, now_unix()).unwrap();

    let resp = handle(get(&issued.link, None), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/admin");

    let cookie = resp.headers()["Set-Cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    let token = cookie
        .trim_start_matches("session=")
        .split(';')
        .next()
        .unwrap()
        .to_string();
    let user = app
        .db
        .with_conn(|conn| load_user_from_session(conn, &token, now_unix()))
        .unwrap();
    assert_eq!(user.map(|(_, email)| email), Some(ADMIN_EMAIL.to_string()));
}

#[test]
fn magic_link_for_visitor_redirects_home() {
    let (_dir, app) = init_test_app();
    let issued = request_magic_link(&app.db, "visita@example.com", now_unix()).unwrap();

    let resp = handle(get(&issued.link, None), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/");
}

#[test]
fn reused_magic_link_is_rejected() {
    let (_dir, app) = init_test_app();
    let issued = request_magic_link(&app.db, "a@b.com", now_unix()).unwrap();

    assert_eq!(handle(get(&issued.link, None), &app).unwrap().status(), 302);

    let resp = respond(get(&issued.link, None), &app);
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Link inválido ou expirado"));
}

#[test]
fn logout_revokes_the_session() {
    let (_dir, app) = init_test_app();
    let token = sign_in(&app, ADMIN_EMAIL);

    let resp = handle(post_form("/logout", "", Some(&token)), &app).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/");
    assert!(resp.headers()["Set-Cookie"]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    // The old cookie no longer opens the panel.
    let resp = respond(get("/admin", Some(&token)), &app);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
}
