//! Access gateway
//!
//! Every request is classified by path, then a pure decision table combines
//! the class, the HTTP method and the credential status into one of four
//! outcomes. The middleware only applies the outcome; it reads nothing that
//! the gated request could have changed.
//!
//! | class            | read (GET/HEAD) | write           |
//! |------------------|-----------------|-----------------|
//! | always public    | allow           | allow           |
//! | link collection  | allow           | credential      |
//! | other API        | credential      | credential      |
//! | page             | credential      | credential      |
//!
//! Without a valid credential, API classes are denied with 401 and pages are
//! redirected to the login page. When no credential is configured at all,
//! protected requests fail as a server configuration error.

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode, header::LOCATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::core::auth::{AuthContext, CredentialStatus, presented_credential};
use crate::core::error::{ConfigError, RequestError, VaultError};
use crate::links::handlers::AppState;

/// Path of the credential-entry page
pub const LOGIN_PATH: &str = "/login";

/// Path-based classification of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// `/login`
    LoginPage,
    /// `/public` and below: the anonymous browse page
    PublicPage,
    /// `/api/auth/*`: credential establishment and teardown
    AuthEndpoint,
    /// `/health`, `/healthz`
    HealthCheck,
    /// `/api/links`, `/api/links/*`, `/api/categories`
    LinkCollection,
    /// Any other `/api/*` path
    Api,
    /// Anything else: browser navigation
    Page,
}

impl RouteClass {
    pub fn classify(path: &str) -> Self {
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        if path == LOGIN_PATH {
            RouteClass::LoginPage
        } else if under(path, "/public") {
            RouteClass::PublicPage
        } else if under(path, "/api/auth") {
            RouteClass::AuthEndpoint
        } else if path == "/health" || path == "/healthz" {
            RouteClass::HealthCheck
        } else if under(path, "/api/links") || path == "/api/categories" {
            RouteClass::LinkCollection
        } else if under(path, "/api") {
            RouteClass::Api
        } else {
            RouteClass::Page
        }
    }

    /// Reachable without a credential regardless of method
    pub fn is_always_public(&self) -> bool {
        matches!(
            self,
            RouteClass::LoginPage
                | RouteClass::PublicPage
                | RouteClass::AuthEndpoint
                | RouteClass::HealthCheck
        )
    }

    /// Consumed by programs rather than a navigating browser
    pub fn is_api(&self) -> bool {
        matches!(
            self,
            RouteClass::AuthEndpoint
                | RouteClass::HealthCheck
                | RouteClass::LinkCollection
                | RouteClass::Api
        )
    }
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// What the gateway does with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayDecision {
    /// Pass through with the given context
    Allow(AuthContext),
    /// 401 with a JSON error body
    Deny,
    /// 303 to the login page
    RedirectToLogin,
    /// 500: no credential configured for a protected request
    Misconfigured,
}

fn is_read(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// The gateway decision table
pub fn decide(class: RouteClass, method: &Method, credential: CredentialStatus) -> GatewayDecision {
    let context = if credential == CredentialStatus::Valid {
        AuthContext::Owner
    } else {
        AuthContext::Anonymous
    };

    if class.is_always_public() {
        return GatewayDecision::Allow(context);
    }
    if class == RouteClass::LinkCollection && is_read(method) {
        return GatewayDecision::Allow(context);
    }

    match credential {
        CredentialStatus::Valid => GatewayDecision::Allow(AuthContext::Owner),
        CredentialStatus::Unconfigured => GatewayDecision::Misconfigured,
        CredentialStatus::Invalid if class.is_api() => GatewayDecision::Deny,
        CredentialStatus::Invalid => GatewayDecision::RedirectToLogin,
    }
}

/// Axum middleware applying [`decide`] to every request
///
/// On allow, the [`AuthContext`] is inserted into request extensions for the
/// handlers.
pub async fn access_gateway(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let class = RouteClass::classify(request.uri().path());
    let presented = presented_credential(request.headers());
    let status = state.verifier.status(presented.as_deref());
    let decision = decide(class, request.method(), status);

    match decision {
        GatewayDecision::Allow(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        GatewayDecision::Deny => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                "request denied: missing or invalid credential"
            );
            VaultError::from(RequestError::Unauthorized {
                message: "a valid access token is required".to_string(),
            })
            .into_response()
        }
        GatewayDecision::RedirectToLogin => {
            (StatusCode::SEE_OTHER, [(LOCATION, LOGIN_PATH)]).into_response()
        }
        GatewayDecision::Misconfigured => {
            tracing::error!(
                path = %request.uri().path(),
                "protected request rejected: {}",
                ConfigError::MissingCredential
            );
            VaultError::from(ConfigError::MissingCredential).into_response()
        }
    }
}
