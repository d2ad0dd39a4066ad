//! # linkvault
//!
//! A personal bookmark collection served over HTTP. Anyone may browse the
//! public links; creating, editing, starring, deleting, importing and
//! exporting require the single configured access token.
//!
//! ## Layers
//!
//! - **Link Store** ([`core::LinkStore`]): whole-collection load and atomic
//!   replace against a JSON document ([`storage::JsonFileLinkStore`]) or
//!   memory ([`storage::InMemoryLinkStore`])
//! - **Repository Service** ([`links::LinkRepository`]): create, update,
//!   delete, star toggling and bulk import, serialized by a writer lock
//! - **Credential Verifier** ([`core::CredentialVerifier`]): constant-time
//!   comparison against the injected token, failing closed
//! - **Access Gateway** ([`server::gateway`]): per-path, per-method
//!   allow / deny / redirect decision in front of every route
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use linkvault::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = VaultConfig::load()?;
//!     ServerBuilder::new(config).serve().await
//! }
//! ```

pub mod config;
pub mod core;
pub mod links;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        AuthContext, CredentialStatus, CredentialVerifier, JsonBody, Link, LinkStore, NewLink,
        VaultError, VaultResult,
        error::{ConfigError, LinkError, RequestError, StorageError, ValidationError},
    };

    // === Repository ===
    pub use crate::links::{AppState, ExportDocument, LinkRepository};

    // === Storage ===
    pub use crate::storage::{InMemoryLinkStore, JsonFileLinkStore};

    // === Config ===
    pub use crate::config::VaultConfig;

    // === Server ===
    pub use crate::server::{GatewayDecision, RouteClass, ServerBuilder, decide};
}
