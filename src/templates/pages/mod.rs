pub mod admin;
pub mod admin_form;
pub mod admin_images;
pub mod check_email;
pub mod home;
pub mod login;
pub mod properties;
pub mod property_detail;

pub use admin::admin_page;
pub use admin_form::{listing_form_page, values_from_draft, FormValues, ListingFormVm};
pub use admin_images::{admin_images_page, ImageManagerVm};
pub use check_email::{check_email_content, check_email_page};
pub use home::home_page;
pub use login::login_page;
pub use properties::{properties_page, CatalogVm};
pub use property_detail::property_detail_page;
