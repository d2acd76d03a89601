// responses/files.rs
use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};

/// Raw bytes with a content type; uploads and the stylesheet.
pub fn bytes_response(bytes: Vec<u8>, content_type: &mime::Mime, max_age_secs: u32) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type.as_ref())
        .header("Cache-Control", format!("public, max-age={max_age_secs}"))
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)
}
