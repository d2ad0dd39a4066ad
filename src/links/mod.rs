//! Repository service and HTTP handlers for the link collection

pub mod handlers;
pub mod service;

pub use handlers::AppState;
pub use service::{ExportDocument, LinkRepository};
