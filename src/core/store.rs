//! Store trait for the persisted link collection

use async_trait::async_trait;

use crate::core::error::StorageError;
use crate::core::link::Link;

/// Durable home of the link collection
///
/// The contract is whole-collection in, whole-collection out: `load` returns
/// every link in persisted order and `replace` overwrites the document with
/// exactly the given sequence. Implementations must make `replace` atomic, so
/// a concurrent `load` sees either the old collection or the new one.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Read the full collection
    ///
    /// A store that has never been written returns an empty collection.
    async fn load(&self) -> Result<Vec<Link>, StorageError>;

    /// Replace the full collection
    async fn replace(&self, links: &[Link]) -> Result<(), StorageError>;

    /// Short backend name for logs
    fn backend(&self) -> &'static str;
}
