//! HTTP server: access gateway, route table and builder

pub mod builder;
pub mod gateway;
pub mod router;
pub mod session;

pub use builder::ServerBuilder;
pub use gateway::{GatewayDecision, RouteClass, access_gateway, decide};
