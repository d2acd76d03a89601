mod admin_tests;
mod auth_flow_tests;
mod image_tests;
mod public_tests;
