pub mod contact_form;
pub mod email_cta;
pub mod error;
pub mod filters;
pub mod image_manager;
pub mod notice;
pub mod property_card;

pub use contact_form::contact_section;
pub use email_cta::email_cta_form;
pub use error::error_page;
pub use filters::filters_form;
pub use image_manager::{image_grid, retry_form, RetryAction};
pub use notice::{notice, NoticeKind};
pub use property_card::property_card;
