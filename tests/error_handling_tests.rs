//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Server-side failures never leak paths or credential state
//! - Error matching allows clients to handle specific cases

use axum::http::StatusCode;
use axum::response::IntoResponse;
use linkvault::core::error::FieldValidationError;
use linkvault::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn io_error() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")
}

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_link_not_found_returns_404() {
        let err = VaultError::Link(LinkError::NotFound { id: "7".to_string() });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error_returns_400() {
        let err = VaultError::Validation(ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "url".to_string(),
                message: "is required".to_string(),
            },
        ]));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_body_returns_400() {
        let err = VaultError::Request(RequestError::InvalidBody {
            message: "expected object".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_request_unauthorized_returns_401() {
        let err = VaultError::Request(RequestError::Unauthorized {
            message: "invalid token".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_storage_error_returns_500() {
        let err = VaultError::Storage(StorageError::Write {
            path: PathBuf::from("/data/links.json"),
            source: io_error(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_config_error_returns_500() {
        let err = VaultError::Config(ConfigError::MissingCredential);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let cases: Vec<(VaultError, &str)> = vec![
            (LinkError::NotFound { id: "1".into() }.into(), "LINK_NOT_FOUND"),
            (ValidationError::FieldErrors(vec![]).into(), "VALIDATION_ERROR"),
            (
                RequestError::InvalidBody { message: "x".into() }.into(),
                "INVALID_BODY",
            ),
            (
                RequestError::Unauthorized { message: "x".into() }.into(),
                "UNAUTHORIZED",
            ),
            (ConfigError::MissingCredential.into(), "CONFIG_ERROR"),
            (StorageError::Poisoned("x".into()).into(), "STORAGE_ERROR"),
            (VaultError::Internal("x".into()), "INTERNAL_ERROR"),
        ];

        for (err, code) in cases {
            assert_eq!(err.error_code(), code, "{:?}", err);
        }
    }
}

// =============================================================================
// Error Response Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_error_response_has_code_and_message() {
        let err = VaultError::Link(LinkError::NotFound { id: "3".to_string() });
        let response = err.to_response();

        assert_eq!(response.code, "LINK_NOT_FOUND");
        assert!(response.error.contains("'3'"));
        assert_eq!(response.details, Some(serde_json::json!({ "id": "3" })));
    }

    #[test]
    fn test_validation_errors_include_field_details() {
        let err = VaultError::Validation(ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "categories".to_string(),
                message: "at least one category is required".to_string(),
            },
        ]));
        let response = err.to_response();

        let details = response.details.unwrap();
        assert_eq!(details["fields"][0]["field"], "categories");
    }

    #[test]
    fn test_storage_response_hides_path() {
        let err = VaultError::Storage(StorageError::Read {
            path: PathBuf::from("/secret/place/links.json"),
            source: io_error(),
        });
        let response = err.to_response();

        assert_eq!(response.error, "Internal server error");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_config_response_is_generic() {
        let response = VaultError::Config(ConfigError::MissingCredential).to_response();
        assert_eq!(response.error, "Server configuration error");
    }

    #[test]
    fn test_invalid_record_names_index() {
        let err = ValidationError::InvalidRecord {
            index: 4,
            source: Box::new(ValidationError::FieldErrors(vec![FieldValidationError {
                field: "url".to_string(),
                message: "is required".to_string(),
            }])),
        };

        assert!(err.to_string().contains("index 4"));
        assert!(err.to_string().contains("url"));
    }
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_storage_error_converts_to_vault_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ broken").unwrap_err();
        let err: VaultError = StorageError::Parse {
            path: PathBuf::from("links.json"),
            source: json_err,
        }
        .into();

        assert!(matches!(err, VaultError::Storage(StorageError::Parse { .. })));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_new_link_validation_converts() {
        let err: VaultError = NewLink::default().normalized().unwrap_err().into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_displays_file() {
        let err = ConfigError::ParseError {
            file: Some("vault.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config file 'vault.yaml': bad indent"
        );
    }
}

// =============================================================================
// Into Response Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[test]
    fn test_link_error_into_response_status() {
        let response = VaultError::Link(LinkError::NotFound { id: "1".into() }).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unauthorized_into_response_status() {
        let err = VaultError::Request(RequestError::Unauthorized {
            message: "invalid token".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_config_error_into_response_status() {
        let response = VaultError::Config(ConfigError::MissingCredential).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Repository Error Integration Tests
// =============================================================================

mod repository_error_tests {
    use super::*;

    fn repo() -> LinkRepository {
        LinkRepository::new(Arc::new(InMemoryLinkStore::new()))
    }

    #[tokio::test]
    async fn test_update_nonexistent_link_returns_typed_error() {
        let err = assert_err!(
            repo()
                .update("9", NewLink::new("T", "e.com", ["a"]))
                .await
        );

        match err {
            VaultError::Link(LinkError::NotFound { id }) => assert_eq!(id, "9"),
            other => panic!("Expected LinkError::NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_missing_returns_typed_error() {
        let err = assert_err!(repo().get("1").await);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_successful_operations_return_ok() {
        let repo = repo();
        let link = assert_ok!(repo.add(NewLink::new("T", "e.com", ["a"])).await);

        assert_ok!(repo.get(&link.id).await);
        assert_ok!(repo.toggle_star(&link.id).await);
        assert_ok!(repo.update(&link.id, NewLink::new("U", "e.com", ["a"])).await);
        assert!(assert_ok!(repo.delete(&link.id).await));
    }

    #[test]
    fn test_verifier_distinguishes_unconfigured() {
        let unconfigured = CredentialVerifier::new(None);
        let err = assert_err!(unconfigured.check(Some("anything")));
        assert!(matches!(err, VaultError::Config(ConfigError::MissingCredential)));

        let configured = CredentialVerifier::new(Some("t".to_string()));
        let err = assert_err!(configured.check(Some("wrong")));
        assert!(matches!(
            err,
            VaultError::Request(RequestError::Unauthorized { .. })
        ));
        assert_ok!(configured.check(Some("t")));
    }
}
