//! Core module containing the domain types and traits of linkvault

pub mod auth;
pub mod error;
pub mod extractors;
pub mod link;
pub mod store;

pub use auth::{AuthContext, CredentialStatus, CredentialVerifier};
pub use error::{VaultError, VaultResult};
pub use extractors::JsonBody;
pub use link::{Link, NewLink};
pub use store::LinkStore;
