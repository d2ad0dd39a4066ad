//! In-memory implementation of LinkStore for testing and development

use crate::core::error::StorageError;
use crate::core::{Link, LinkStore};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// In-memory link store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// `replace` swaps the whole vector under the write lock.
#[derive(Clone, Default)]
pub struct InMemoryLinkStore {
    links: Arc<RwLock<Vec<Link>>>,
}

impl InMemoryLinkStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `links`
    pub fn with_links(links: Vec<Link>) -> Self {
        Self {
            links: Arc::new(RwLock::new(links)),
        }
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn load(&self) -> Result<Vec<Link>, StorageError> {
        let links = self
            .links
            .read()
            .map_err(|e| StorageError::Poisoned(format!("Failed to acquire read lock: {}", e)))?;

        Ok(links.clone())
    }

    async fn replace(&self, new_links: &[Link]) -> Result<(), StorageError> {
        let mut links = self
            .links
            .write()
            .map_err(|e| StorageError::Poisoned(format!("Failed to acquire write lock: {}", e)))?;

        *links = new_links.to_vec();

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "in-memory"
    }
}
