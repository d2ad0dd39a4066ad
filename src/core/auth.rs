//! Credential verification for linkvault
//!
//! There is exactly one credential: the configured access token. A request
//! either presents it (and acts as the owner) or it does not (and is
//! anonymous). The verifier fails closed when no token is configured.

use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use constant_time_eq::constant_time_eq;

use crate::core::error::{ConfigError, RequestError, VaultResult};

/// Name of the cookie that carries the credential
pub const ACCESS_COOKIE: &str = "access_token";

/// Authorization context attached to a request by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    /// The request presented the valid credential
    Owner,

    /// No credential, or a wrong one
    Anonymous,
}

impl AuthContext {
    pub fn is_owner(&self) -> bool {
        matches!(self, AuthContext::Owner)
    }
}

/// Outcome of comparing a presented credential with the configured one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Valid,
    Invalid,
    /// The server has no credential to compare against
    Unconfigured,
}

/// Compares presented tokens against the one configured token
#[derive(Clone)]
pub struct CredentialVerifier {
    token: Option<String>,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl CredentialVerifier {
    /// Create a verifier for the given token
    ///
    /// An empty token is treated as no token at all.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    pub fn status(&self, presented: Option<&str>) -> CredentialStatus {
        let Some(expected) = self.token.as_deref() else {
            return CredentialStatus::Unconfigured;
        };

        match presented {
            Some(p) if constant_time_eq(p.as_bytes(), expected.as_bytes()) => {
                CredentialStatus::Valid
            }
            _ => CredentialStatus::Invalid,
        }
    }

    /// Whether `presented` is the configured credential
    ///
    /// Always false when nothing is configured; that condition is logged as
    /// a configuration error. The gateway needs to tell the two failures
    /// apart and calls [`status`](Self::status) instead; this is the boolean
    /// form for callers that do not.
    pub fn verify(&self, presented: Option<&str>) -> bool {
        match self.status(presented) {
            CredentialStatus::Valid => true,
            CredentialStatus::Invalid => false,
            CredentialStatus::Unconfigured => {
                tracing::error!("{}", ConfigError::MissingCredential);
                false
            }
        }
    }

    /// Like [`verify`](Self::verify), but distinguishes why it failed
    pub fn check(&self, presented: Option<&str>) -> VaultResult<()> {
        match self.status(presented) {
            CredentialStatus::Valid => Ok(()),
            CredentialStatus::Invalid => Err(RequestError::Unauthorized {
                message: "invalid access token".to_string(),
            }
            .into()),
            CredentialStatus::Unconfigured => Err(ConfigError::MissingCredential.into()),
        }
    }
}

/// Pull the presented credential out of request headers
///
/// The `access_token` cookie wins; otherwise an `Authorization: Bearer`
/// header is accepted for scripted clients.
pub fn presented_credential(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, ACCESS_COOKIE).or_else(|| bearer_token(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Whether `token` can travel as a cookie value unquoted
///
/// Allowed are the RFC 6265 cookie-octets: visible ASCII except `"`, `,`,
/// `;` and `\`. A configured token outside this set could never be matched
/// through the cookie.
pub fn is_cookie_safe(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

/// `Set-Cookie` value that establishes the credential for `max_age_secs`
pub fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        ACCESS_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the credential
pub fn clear_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
