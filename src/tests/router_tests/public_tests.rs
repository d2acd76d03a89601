use crate::errors::ServerError;
use crate::router::{handle, respond};
use crate::tests::utils::{body_string, get, init_test_app, post_form, seed_images, seed_listing};

fn seed_catalog(app: &crate::app::App) {
    seed_listing(
        app,
        &[
            ("title", "Casa Campinas Verde"),
            ("type", "casa"),
            ("location", "Campinas"),
            ("price", "500000"),
        ],
    );
    seed_listing(app, &[("title", "Apartamento Jardins"), ("is_featured", "on")]);
    seed_listing(
        app,
        &[
            ("title", "Terreno Serra Azul"),
            ("type", "terreno"),
            ("status", "vendido"),
            ("price", "200000"),
            ("bedrooms", "0"),
        ],
    );
}

#[test]
fn home_shows_featured_listings() {
    let (_dir, app) = init_test_app();
    seed_catalog(&app);

    let resp = handle(get("/", None), &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Apartamento Jardins"));
    assert!(!body.contains("Casa Campinas Verde"));
    assert!(body.contains("Entrar"), "anonymous visitors see the sign-in link");
}

#[test]
fn home_falls_back_to_recent_available() {
    let (_dir, app) = init_test_app();
    seed_listing(&app, &[("title", "Casa Sem Destaque")]);

    let body = body_string(handle(get("/", None), &app).unwrap());
    assert!(body.contains("Casa Sem Destaque"));
}

#[test]
fn catalog_lists_everything_without_filters() {
    let (_dir, app) = init_test_app();
    seed_catalog(&app);

    let body = body_string(handle(get("/imoveis", None), &app).unwrap());
    assert!(body.contains("3 imóveis encontrados de 3"));
    assert!(body.contains("Casa Campinas Verde"));
    assert!(body.contains("Terreno Serra Azul"));
}

#[test]
fn catalog_filters_by_type_and_status() {
    let (_dir, app) = init_test_app();
    seed_catalog(&app);

    let body = body_string(handle(get("/imoveis?type=casa", None), &app).unwrap());
    assert!(body.contains("1 imóvel encontrado de 3"));
    assert!(body.contains("Casa Campinas Verde"));
    assert!(!body.contains("Apartamento Jardins"));

    let body = body_string(handle(get("/imoveis?status=vendido", None), &app).unwrap());
    assert!(body.contains("1 imóvel encontrado de 3"));
    assert!(body.contains("Terreno Serra Azul"));
}

#[test]
fn catalog_search_matches_code_or_title() {
    let (_dir, app) = init_test_app();
    seed_catalog(&app);

    let body = body_string(handle(get("/imoveis?q=jardins", None), &app).unwrap());
    assert!(body.contains("1 imóvel encontrado de 3"));

    let body = body_string(handle(get("/imoveis?q=nada+parecido", None), &app).unwrap());
    assert!(body.contains("Nenhum imóvel encontrado"));
}

#[test]
fn detail_page_shows_listing_and_cover() {
    let (_dir, app) = init_test_app();
    let id = seed_listing(&app, &[]);
    seed_images(&app, &id, 2);

    let resp = handle(get(&format!("/imoveis/{id}"), None), &app).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Apartamento Jardins"));
    assert!(body.contains("https://img.example.com/0.jpg"));
    assert!(body.contains("R$ 850.000"));
}

#[test]
fn unknown_listing_is_404() {
    let (_dir, app) = init_test_app();

    assert!(matches!(
        handle(get("/imoveis/NAOEXISTE", None), &app),
        Err(ServerError::NotFound)
    ));
    let resp = respond(get("/imoveis/NAOEXISTE", None), &app);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Página não encontrada"));
}

#[test]
fn unknown_route_is_404() {
    let (_dir, app) = init_test_app();
    assert_eq!(respond(get("/nao/existe", None), &app).status(), 404);
}

#[test]
fn contact_message_is_stored() {
    let (_dir, app) = init_test_app();

    let resp = handle(
        post_form(
            "/contato",
            "name=Ana&email=Ana%40Example.com&phone=&message=Quero+visitar",
            None,
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Mensagem enviada"));

    let (count, email): (i64, String) = app
        .db
        .with_conn(|conn| {
            conn.query_row(
                "select count(*), max(email) from contact_messages",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .map_err(ServerError::from)
        })
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(email, "ana@example.com");
}

#[test]
fn invalid_contact_keeps_what_was_typed() {
    let (_dir, app) = init_test_app();

    let resp = handle(
        post_form("/contato", "name=&email=ana%40example.com&message=Oi", None),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 400);
    let body = body_string(resp);
    assert!(body.contains("Informe seu nome"));
    assert!(body.contains("value=\"ana@example.com\""));

    let count: i64 = app
        .db
        .with_conn(|conn| {
            conn.query_row("select count(*) from contact_messages", [], |r| r.get(0))
                .map_err(ServerError::from)
        })
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn static_assets_are_served() {
    let (_dir, app) = init_test_app();

    let resp = handle(get("/static/main.css", None), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers()["Content-Type"]
        .to_str()
        .unwrap()
        .starts_with("text/css"));

    let resp = handle(get("/static/placeholder.svg", None), &app).unwrap();
    assert_eq!(resp.headers()["Content-Type"], "image/svg+xml");

    assert!(matches!(
        handle(get("/static/secret.txt", None), &app),
        Err(ServerError::NotFound)
    ));
}
