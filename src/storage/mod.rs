//! Storage implementations for the link collection

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryLinkStore;
pub use json_file::JsonFileLinkStore;
