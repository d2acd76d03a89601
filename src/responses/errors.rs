use crate::errors::ServerError;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};

/// Convert a ServerError into a proper HTML response.
///
/// Unauthorized on an HTML route means "sign in first", so it redirects.
pub fn error_to_response(err: ServerError) -> Response {
    match err {
        ServerError::Unauthorized(_) => ResponseBuilder::new()
            .status(302)
            .header("Location", "/login")
            .body(Body::empty())
            .unwrap_or_else(|_| Response::new(Body::empty())),
        other => {
            let status = other.status();
            html_error_response(status, &public_message(&other))
        }
    }
}

/// Internal details stay in the logs.
fn public_message(err: &ServerError) -> String {
    match err {
        ServerError::NotFound => "Página não encontrada".to_string(),
        ServerError::BadRequest(msg) => msg.clone(),
        ServerError::Forbidden(_) => "Acesso restrito a administradores".to_string(),
        ServerError::Unauthorized(msg) => msg.clone(),
        ServerError::DbError(_)
        | ServerError::StorageError(_)
        | ServerError::MailerError(_)
        | ServerError::InternalError => "Erro interno. Tente novamente em instantes.".to_string(),
    }
}

/// Build an HTML error page
pub fn html_error_response(status: u16, message: &str) -> Response {
    let html = error_page(status, message).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(html))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
