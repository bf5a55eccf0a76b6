//! HTTP request handlers.

pub mod admin_handler;
pub mod case_handler;
pub mod upload_handler;

pub use admin_handler::admin_routes;
pub use case_handler::case_routes;
pub use upload_handler::upload_routes;
