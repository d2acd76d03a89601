pub mod errors;
pub mod files;
pub mod html;

pub use errors::error_to_response;
pub use files::bytes_response;
pub use html::{html_response, html_response_with_status, redirect, redirect_with_cookie};
